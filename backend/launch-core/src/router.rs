//! Dispatch table from message strings to lifecycle actions.

use crate::ipc::MessageHandler;
use crate::lifecycle::LifecycleHandle;

use common::{Message, RESTART_MESSAGE, SHOW_MAIN_MESSAGE};

use log::{error, info};

/// What the router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    ShowMain,
    Restart,
    Ignored,
}

/// Maps known messages onto the lifecycle actor.
///
/// Matching is exact and case-sensitive. Unknown messages are logged and
/// dropped; routing never fails. Each call waits for the lifecycle action to
/// finish, so the server routes one message at a time.
#[derive(Clone)]
pub struct MessageRouter {
    lifecycle: LifecycleHandle,
}

impl MessageRouter {
    pub fn new(lifecycle: LifecycleHandle) -> Self {
        Self { lifecycle }
    }

    pub async fn route(&self, message: Message) -> RouteAction {
        match message.as_str() {
            SHOW_MAIN_MESSAGE => {
                if let Err(e) = self.lifecycle.show_main().await {
                    error!("Could not show main window: {e}");
                }
                RouteAction::ShowMain
            }
            RESTART_MESSAGE => {
                info!("Received a message to restart. Restarting now.");
                if let Err(e) = self.lifecycle.restart(true).await {
                    error!("Client could not be restarted: {e}");
                }
                RouteAction::Restart
            }
            other => {
                info!("Message \"{other}\" is not a supported type");
                RouteAction::Ignored
            }
        }
    }
}

impl MessageHandler for MessageRouter {
    async fn handle(&self, message: Message) {
        self.route(message).await;
    }
}
