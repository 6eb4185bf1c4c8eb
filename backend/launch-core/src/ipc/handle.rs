//! Handle returned when the message server starts.

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to the running message server task.
///
/// # Lifecycle
///
/// [`stop`](MessageServerHandle::stop) stops accepting new connections. A
/// connection that is already being read is allowed to finish or time out,
/// then the task exits and the channel name is released. Dropping the handle
/// without calling `stop` also ends the accept loop.
pub struct MessageServerHandle {
    channel_name: String,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MessageServerHandle {
    pub(crate) fn new(
        channel_name: String,
        shutdown_tx: watch::Sender<bool>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            channel_name,
            shutdown_tx,
            task,
        }
    }

    /// Channel the server is listening on.
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub async fn stop(self) {
        info!("Stopping message server on {}", self.channel_name);
        self.shutdown_tx.send_replace(true);

        if let Err(e) = self.task.await {
            warn!("Message server task ended abnormally: {e}");
        }
    }
}
