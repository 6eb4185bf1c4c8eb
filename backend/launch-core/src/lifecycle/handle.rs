//! Lifecycle actor.
//!
//! All lifecycle mutations (the startup `init`, routed messages, shutdown)
//! go through one mpsc channel into a dedicated task that owns the
//! [`LifecycleManager`]. Commands are applied strictly one after another, so
//! two transitions can never overlap. Reads go through a snapshot behind an
//! `RwLock` and never wait on a running transition.

use crate::error::lifecycle::LifecycleError;
use crate::lifecycle::{LifecycleManager, LifecycleSnapshot};

use common::RunLevel;

use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::{RwLock, mpsc, oneshot, watch};

type Reply = oneshot::Sender<Result<(), LifecycleError>>;

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Commands applied by the lifecycle actor.
///
/// Each carries the reply channel for its result.
#[derive(Debug)]
pub enum LifecycleCommand {
    Init { level: RunLevel, reply: Reply },
    Stop { force_close: bool, reply: Reply },
    Restart { force_close: bool, reply: Reply },
    ShowMain { reply: Reply },
}

/// Cloneable handle to the lifecycle actor.
///
/// All clones talk to the same manager. The actor stops once every handle
/// has been dropped.
#[derive(Clone)]
pub struct LifecycleHandle {
    /// Channel to send commands to the actor
    command_tx: mpsc::Sender<LifecycleCommand>,

    /// Shared read-only view of the manager
    snapshot: Arc<RwLock<LifecycleSnapshot>>,

    /// Flips to true once a fatal lifecycle error has happened
    halt_rx: watch::Receiver<bool>,
}

impl LifecycleHandle {
    /// Move `manager` into a new actor task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(manager: LifecycleManager) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (halt_tx, halt_rx) = watch::channel(false);
        let snapshot = Arc::new(RwLock::new(manager.snapshot()));

        tokio::spawn(lifecycle_actor(
            manager,
            command_rx,
            Arc::clone(&snapshot),
            halt_tx,
        ));
        info!("Lifecycle actor spawned");

        Self {
            command_tx,
            snapshot,
            halt_rx,
        }
    }

    pub async fn init(&self, level: RunLevel) -> Result<(), LifecycleError> {
        self.request(|reply| LifecycleCommand::Init { level, reply })
            .await
    }

    pub async fn stop(&self, force_close: bool) -> Result<(), LifecycleError> {
        self.request(|reply| LifecycleCommand::Stop { force_close, reply })
            .await
    }

    pub async fn restart(&self, force_close: bool) -> Result<(), LifecycleError> {
        self.request(|reply| LifecycleCommand::Restart { force_close, reply })
            .await
    }

    pub async fn show_main(&self) -> Result<(), LifecycleError> {
        self.request(|reply| LifecycleCommand::ShowMain { reply })
            .await
    }

    /// Current state of the manager (read-only).
    pub async fn snapshot(&self) -> LifecycleSnapshot {
        *self.snapshot.read().await
    }

    pub fn is_halted(&self) -> bool {
        *self.halt_rx.borrow()
    }

    /// Resolve once a fatal error has happened or the actor is gone.
    pub async fn halted(&self) {
        let mut halt_rx = self.halt_rx.clone();
        if halt_rx.wait_for(|halted| *halted).await.is_err() {
            warn!("Lifecycle actor is gone");
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(Reply) -> LifecycleCommand,
    ) -> Result<(), LifecycleError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|e| LifecycleError::actor_unavailable(format!("lifecycle actor stopped: {e}")))?;

        reply_rx.await.map_err(|e| {
            LifecycleError::actor_unavailable(format!("lifecycle actor dropped the reply: {e}"))
        })?
    }
}

/// The lifecycle actor task.
///
/// Owns the manager and applies commands in arrival order. After each
/// command the snapshot is refreshed; a fatal result trips the halt flag
/// before the reply is sent.
async fn lifecycle_actor(
    mut manager: LifecycleManager,
    mut command_rx: mpsc::Receiver<LifecycleCommand>,
    snapshot: Arc<RwLock<LifecycleSnapshot>>,
    halt_tx: watch::Sender<bool>,
) {
    info!("Lifecycle actor started");

    while let Some(cmd) = command_rx.recv().await {
        let (result, reply) = match cmd {
            LifecycleCommand::Init { level, reply } => (manager.init(level), reply),
            LifecycleCommand::Stop { force_close, reply } => (manager.stop(force_close), reply),
            LifecycleCommand::Restart { force_close, reply } => {
                (manager.restart(force_close), reply)
            }
            LifecycleCommand::ShowMain { reply } => (manager.show_main(), reply),
        };

        *snapshot.write().await = manager.snapshot();

        if let Err(ref e) = result {
            if e.is_fatal() {
                error!("CRITICAL: Lifecycle failure, application will be halted: {e}");
                halt_tx.send_replace(true);
            }
        }

        // The requester may have given up waiting; the transition still happened.
        let _ = reply.send(result);
    }

    info!("Lifecycle actor stopped");
}
