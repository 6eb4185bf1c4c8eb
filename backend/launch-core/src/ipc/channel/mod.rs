//! Local stream transport named after the application key.
//!
//! Unix uses a domain socket file, Windows a named pipe. Both expose the same
//! surface: [`bind`], [`connect`], [`ChannelListener::accept`] and a
//! [`ChannelStream`] that is `AsyncRead + AsyncWrite`.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::{ChannelListener, ChannelStream, bind, connect};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{ChannelListener, ChannelStream, bind, connect};
