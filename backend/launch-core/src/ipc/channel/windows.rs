use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::trace;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::windows::named_pipe::{
    ClientOptions, NamedPipeClient, NamedPipeServer, ServerOptions,
};
use tokio::time::sleep as TokioSleep;

/// `ERROR_PIPE_BUSY`: every server instance is serving another client.
const ERROR_PIPE_BUSY: i32 = 231;
const BUSY_RETRY_INITIAL: Duration = Duration::from_millis(10);
const BUSY_RETRY_MAX_INTERVAL: Duration = Duration::from_millis(200);
const BUSY_RETRY_MAX_ELAPSED: Duration = Duration::from_secs(5);

/// Either end of a connected pipe.
pub enum ChannelStream {
    Server(NamedPipeServer),
    Client(NamedPipeClient),
}

impl AsyncRead for ChannelStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChannelStream::Server(s) => Pin::new(s).poll_read(cx, buf),
            ChannelStream::Client(c) => Pin::new(c).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ChannelStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            ChannelStream::Server(s) => Pin::new(s).poll_write(cx, buf),
            ChannelStream::Client(c) => Pin::new(c).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChannelStream::Server(s) => Pin::new(s).poll_flush(cx),
            ChannelStream::Client(c) => Pin::new(c).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChannelStream::Server(s) => Pin::new(s).poll_shutdown(cx),
            ChannelStream::Client(c) => Pin::new(c).poll_shutdown(cx),
        }
    }
}

pub struct ChannelListener {
    name: String,
    server: NamedPipeServer,
}

/// Create the first pipe instance. Fails if another process already owns `name`.
pub fn bind(name: &str) -> io::Result<ChannelListener> {
    let server = ServerOptions::new().first_pipe_instance(true).create(name)?;
    Ok(ChannelListener {
        name: name.to_string(),
        server,
    })
}

/// Open the pipe, retrying while the single server instance is busy.
///
/// Callers usually bound this with a shorter timeout of their own; the busy
/// error is returned once the backoff gives up.
pub async fn connect(name: &str) -> io::Result<ChannelStream> {
    let mut backoff = ExponentialBackoff {
        initial_interval: BUSY_RETRY_INITIAL,
        max_interval: BUSY_RETRY_MAX_INTERVAL,
        max_elapsed_time: Some(BUSY_RETRY_MAX_ELAPSED),
        ..Default::default()
    };

    loop {
        let e = match ClientOptions::new().open(name) {
            Ok(client) => return Ok(ChannelStream::Client(client)),
            Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) => e,
            Err(e) => return Err(e),
        };

        match backoff.next_backoff() {
            Some(duration) => {
                trace!("Pipe {name} busy, retrying after {duration:?}");
                TokioSleep(duration).await;
            }
            None => return Err(e),
        }
    }
}

impl ChannelListener {
    pub async fn accept(&mut self) -> io::Result<ChannelStream> {
        self.server.connect().await?;

        // Hand out the connected instance and leave a fresh one listening.
        let connected = std::mem::replace(&mut self.server, ServerOptions::new().create(&self.name)?);
        Ok(ChannelStream::Server(connected))
    }
}
