//! Messaging between a freshly launched process and the running primary.
//!
//! One UTF-8 message per connection, no framing: the sender writes the bytes
//! and closes its write side, the receiver reads until end of stream. Every
//! wait (accept-then-read, connect, write) is bounded by the configured
//! timeout.
//!
//! - [`start_message_server`] runs in the primary and hands each message to a
//!   [`MessageHandler`], normally the [`MessageRouter`](crate::router::MessageRouter).
//! - [`MessageClient`] runs in a secondary and reports success as a `bool`.
//!
//! Errors on this layer are logged where they happen and never travel past
//! the server or client.

pub(crate) mod channel;
mod client;
mod handle;
mod server;

pub use client::MessageClient;
pub use handle::MessageServerHandle;
pub use server::start_message_server;

use common::Message;

use std::future::Future;

/// Receiver of decoded messages on the primary.
///
/// The server awaits `handle` before accepting the next connection.
pub trait MessageHandler: Send + Sync + 'static {
    fn handle(&self, message: Message) -> impl Future<Output = ()> + Send;
}
