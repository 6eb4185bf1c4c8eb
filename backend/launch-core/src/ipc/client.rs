//! Message client used by a secondary instance.

use crate::error::ipc::IpcError;
use crate::instance::Endpoint;
use crate::ipc::channel;

use common::{ErrorLocation, Message};

use std::panic::Location;
use std::time::Duration;

use log::{debug, error};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

/// Sends one message to the primary instance for an endpoint.
#[derive(Debug, Clone)]
pub struct MessageClient {
    endpoint: Endpoint,
    timeout: Duration,
}

impl MessageClient {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Deliver `message`, returning `true` only if both the connect and the
    /// write finished within the timeout.
    ///
    /// Failures are logged here and never returned. The connection is closed
    /// afterwards whatever the outcome.
    pub async fn send(&self, message: &Message) -> bool {
        match self.try_send(message).await {
            Ok(()) => {
                debug!("Sent message to {}", self.endpoint.key());
                true
            }
            Err(e) => {
                error!("Could not send message to {}: {e}", self.endpoint.key());
                false
            }
        }
    }

    pub(crate) async fn try_send(&self, message: &Message) -> Result<(), IpcError> {
        let channel_name = self.endpoint.channel_name();

        let mut stream = match timeout(self.timeout, channel::connect(&channel_name)).await {
            Err(_) => return Err(IpcError::timeout("connect", self.timeout)),
            Ok(Err(e)) => {
                return Err(IpcError::Connection {
                    message: format!("Failed to connect to {channel_name}: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Ok(Ok(stream)) => stream,
        };

        let write = async {
            stream.write_all(message.as_bytes()).await?;
            stream.flush().await?;
            // Closing the write side is what ends the server's read.
            stream.shutdown().await
        };

        match timeout(self.timeout, write).await {
            Err(_) => Err(IpcError::timeout("message write", self.timeout)),
            Ok(Err(e)) => Err(IpcError::Write {
                message: format!("Failed to write message: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
            Ok(Ok(())) => Ok(()),
        }
    }
}
