use crate::{CHANNEL_FILE_EXTENSION, LOCK_FILE_EXTENSION};

use common::ApplicationKey;

use std::path::{Path, PathBuf};

/// OS-level names derived from one [`ApplicationKey`].
///
/// On Unix the channel is a domain socket next to the lock file. On Windows
/// it is a named pipe and only the lock file lives in the runtime directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    key: ApplicationKey,
    runtime_dir: PathBuf,
}

impl Endpoint {
    /// Endpoint for `key`, rooted at `runtime_dir` or the per-user default.
    pub fn new(key: ApplicationKey, runtime_dir: Option<PathBuf>) -> Self {
        Self {
            key,
            runtime_dir: runtime_dir.unwrap_or_else(default_runtime_dir),
        }
    }

    pub fn key(&self) -> &ApplicationKey {
        &self.key
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    pub fn lock_path(&self) -> PathBuf {
        self.runtime_dir
            .join(format!("{}{LOCK_FILE_EXTENSION}", self.key.file_stem()))
    }

    #[cfg(unix)]
    pub fn socket_path(&self) -> PathBuf {
        self.runtime_dir
            .join(format!("{}{CHANNEL_FILE_EXTENSION}", self.key.file_stem()))
    }

    /// Address handed to the channel transport.
    #[cfg(unix)]
    pub fn channel_name(&self) -> String {
        self.socket_path().to_string_lossy().into_owned()
    }

    #[cfg(windows)]
    pub fn channel_name(&self) -> String {
        format!(r"\\.\pipe\{}", self.key.file_stem())
    }
}

/// `$XDG_RUNTIME_DIR` where the platform has one, the temp dir otherwise.
pub fn default_runtime_dir() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(std::env::temp_dir)
}
