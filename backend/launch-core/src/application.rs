//! Composition of lock, messaging and lifecycle into one launch.

use crate::config::LaunchSettings;
use crate::error::CoreError;
use crate::instance::{Endpoint, InstanceLock};
use crate::ipc::{MessageClient, MessageServerHandle, start_message_server};
use crate::lifecycle::{ControllerFactory, LifecycleHandle, LifecycleManager, WindowFactory};
use crate::router::MessageRouter;

use common::{InstanceState, Message};

use std::future::Future;

use log::{error, info, warn};

/// How a launch ended, and the process exit code for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Primary shut down on request.
    Normal,
    /// Secondary handed its message to the primary (or tried to).
    Forwarded,
    /// Primary halted after a fatal lifecycle error.
    Fatal,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Normal => 0,
            ExitStatus::Forwarded | ExitStatus::Fatal => 1,
        }
    }
}

enum Messaging {
    Server(MessageServerHandle),
    Client(MessageClient),
}

/// One launch of the client.
///
/// [`start`](Application::start) decides primary or secondary. A primary owns
/// the lock, serves the message channel and runs the lifecycle manager; a
/// secondary only holds a client to the primary.
pub struct Application {
    settings: LaunchSettings,
    lock: InstanceLock,
    messaging: Messaging,
    lifecycle: Option<LifecycleHandle>,
}

impl Application {
    /// Take or observe the instance lock, then set up the matching role.
    ///
    /// For a primary the message server is listening before the client is
    /// initialized at the configured run level.
    ///
    /// # Errors
    ///
    /// Lock acquisition, channel binding and initialization failures are all
    /// fatal and returned as [`CoreError`].
    pub async fn start(
        settings: LaunchSettings,
        window_factory: Box<dyn WindowFactory>,
        controller_factory: Box<dyn ControllerFactory>,
    ) -> Result<Self, CoreError> {
        let endpoint = Endpoint::new(settings.key.clone(), settings.runtime_dir.clone());
        let lock = InstanceLock::try_acquire(&endpoint)?;

        if !lock.is_primary() {
            info!("Another instance owns {}, running as secondary", settings.key);
            let client = MessageClient::new(endpoint, settings.ipc_timeout);
            return Ok(Self {
                settings,
                lock,
                messaging: Messaging::Client(client),
                lifecycle: None,
            });
        }

        info!("Running as primary for {}", settings.key);

        let lifecycle =
            LifecycleHandle::spawn(LifecycleManager::new(window_factory, controller_factory));
        let router = MessageRouter::new(lifecycle.clone());
        let server = start_message_server(&endpoint, router, settings.ipc_timeout).await?;

        if let Err(e) = lifecycle.init(settings.run_level).await {
            server.stop().await;
            return Err(e.into());
        }

        Ok(Self {
            settings,
            lock,
            messaging: Messaging::Server(server),
            lifecycle: Some(lifecycle),
        })
    }

    pub fn instance_state(&self) -> InstanceState {
        self.lock.state()
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    /// Lifecycle of a primary; `None` for a secondary.
    pub fn lifecycle(&self) -> Option<&LifecycleHandle> {
        self.lifecycle.as_ref()
    }

    /// Run until there is nothing left to do.
    ///
    /// A secondary forwards its message (default `showMain`) and returns
    /// immediately. A primary serves until `shutdown` resolves or a fatal
    /// lifecycle error halts it, then tears everything down.
    pub async fn run_until<F>(mut self, shutdown: F) -> ExitStatus
    where
        F: Future<Output = ()>,
    {
        match self.messaging {
            Messaging::Client(ref client) => {
                let message = self.settings.message.clone().unwrap_or_else(Message::show_main);
                if client.send(&message).await {
                    info!("Forwarded \"{message}\" to the running instance");
                } else {
                    warn!("Running instance did not receive \"{message}\"");
                }
                ExitStatus::Forwarded
            }
            Messaging::Server(server) => {
                let Some(lifecycle) = self.lifecycle.take() else {
                    server.stop().await;
                    return ExitStatus::Fatal;
                };

                let halted = tokio::select! {
                    _ = shutdown => false,
                    _ = lifecycle.halted() => true,
                };

                server.stop().await;

                let status = if halted {
                    ExitStatus::Fatal
                } else {
                    info!("Shutting down");
                    match lifecycle.stop(true).await {
                        Ok(()) => ExitStatus::Normal,
                        Err(e) if e.is_fatal() => {
                            error!("CRITICAL: Shutdown failed: {e}");
                            ExitStatus::Fatal
                        }
                        Err(e) => {
                            warn!("Shutdown was not clean: {e}");
                            ExitStatus::Normal
                        }
                    }
                };

                self.lock.release();
                status
            }
        }
    }
}
