//! Message server run by the primary instance.
//!
//! Connections are served strictly one at a time: connection N+1 is not
//! accepted until connection N has been read (or has timed out) and its
//! message has been handled. Messages therefore reach the handler in arrival
//! order and each exactly once.

use crate::error::ipc::IpcError;
use crate::instance::Endpoint;
use crate::ipc::MessageHandler;
use crate::ipc::channel::{self, ChannelListener, ChannelStream};
use crate::ipc::handle::MessageServerHandle;

use common::{ErrorLocation, MAX_MESSAGE_BYTES, Message};

use std::panic::Location;
use std::time::Duration;

use log::{debug, error, info};
use tokio::io::AsyncReadExt;
use tokio::spawn as TokioSpawn;
use tokio::sync::watch;
use tokio::time::timeout;

/// Start listening on the channel for `endpoint` and serve it in a background task.
///
/// Every decoded message is passed to `handler`, awaited, before the next
/// connection is accepted.
///
/// # Errors
///
/// Returns [`IpcError::Bind`] if the channel cannot be bound. For a primary
/// this is fatal: it holds the lock but cannot serve.
pub async fn start_message_server<H: MessageHandler>(
    endpoint: &Endpoint,
    handler: H,
    read_timeout: Duration,
) -> Result<MessageServerHandle, IpcError> {
    let channel_name = endpoint.channel_name();

    let listener = channel::bind(&channel_name).map_err(|e| IpcError::Bind {
        message: format!("Failed to bind {channel_name}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!("Message server listening on {channel_name}");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = TokioSpawn(accept_loop(listener, handler, read_timeout, shutdown_rx));

    Ok(MessageServerHandle::new(channel_name, shutdown_tx, task))
}

async fn accept_loop<H: MessageHandler>(
    mut listener: ChannelListener,
    handler: H,
    read_timeout: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        let stream = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(stream) => stream,
                Err(e) => {
                    error!("Failed to accept message connection: {e}");
                    continue;
                }
            },
        };

        handle_connection(stream, &handler, read_timeout).await;
    }

    info!("Message server stopped accepting connections");
}

/// Read one message, hand it on, then close the connection.
///
/// Every failure here is logged and dropped; the server keeps listening.
async fn handle_connection<H: MessageHandler>(
    mut stream: ChannelStream,
    handler: &H,
    read_timeout: Duration,
) {
    match read_message(&mut stream, read_timeout).await {
        Ok(Some(message)) => {
            debug!("Message received ({} bytes)", message.as_bytes().len());
            handler.handle(message).await;
        }
        Ok(None) => debug!("Connection closed without a message"),
        Err(e) => error!("Discarding message connection: {e}"),
    }
}

/// Read until the peer closes its write side, bounded by `read_timeout`.
///
/// Returns `Ok(None)` for an empty payload.
async fn read_message(
    stream: &mut ChannelStream,
    read_timeout: Duration,
) -> Result<Option<Message>, IpcError> {
    let mut buf = Vec::new();
    let limit = MAX_MESSAGE_BYTES as u64 + 1;

    let read = timeout(read_timeout, stream.take(limit).read_to_end(&mut buf)).await;
    match read {
        Err(_) => Err(IpcError::timeout("message read", read_timeout)),
        Ok(Err(e)) => Err(IpcError::Read {
            message: format!("Failed to read message: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Ok(Ok(0)) => Ok(None),
        Ok(Ok(_)) => Ok(Some(Message::from_bytes(buf)?)),
    }
}
