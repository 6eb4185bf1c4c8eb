use std::fs::{create_dir_all, remove_file};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::net::{UnixListener, UnixStream};

pub type ChannelStream = UnixStream;

/// Listening socket that removes its file when dropped.
pub struct ChannelListener {
    inner: UnixListener,
    path: PathBuf,
}

/// Bind the socket at `name`.
///
/// Only the lock holder calls this, so a socket file that is already there
/// was left by a previous holder that died, and is removed first.
pub fn bind(name: &str) -> io::Result<ChannelListener> {
    let path = PathBuf::from(name);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }
    if path.exists() {
        debug!("Removing stale socket {}", path.display());
        remove_file(&path)?;
    }
    let inner = UnixListener::bind(&path)?;
    Ok(ChannelListener { inner, path })
}

pub async fn connect(name: &str) -> io::Result<ChannelStream> {
    UnixStream::connect(Path::new(name)).await
}

impl ChannelListener {
    pub async fn accept(&mut self) -> io::Result<ChannelStream> {
        let (stream, _addr) = self.inner.accept().await?;
        Ok(stream)
    }
}

impl Drop for ChannelListener {
    fn drop(&mut self) {
        if let Err(e) = remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove socket {}: {e}", self.path.display());
            }
        }
    }
}
