use crate::error::lock::LockError;
use crate::instance::Endpoint;

use common::InstanceState;

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, info, warn};

/// System-wide exclusive claim on an application key.
///
/// Backed by an advisory lock on `<runtime_dir>/<key>.lock`. The OS drops the
/// lock when the holding process exits, so a crashed primary never leaves a
/// stale claim behind. The file itself is only an occupancy marker: nothing is
/// written to it and it is never deleted.
pub struct InstanceLock {
    path: PathBuf,
    state: InstanceState,
    file: Option<File>,
}

impl InstanceLock {
    /// Decide, once and without waiting, whether this process is primary.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Acquisition`] when the lock file can neither be
    /// locked nor observed as locked by someone else (permissions, missing
    /// runtime directory, unsupported filesystem). Callers must abort startup.
    pub fn try_acquire(endpoint: &Endpoint) -> Result<Self, LockError> {
        let path = endpoint.lock_path();

        create_dir_all(endpoint.runtime_dir()).map_err(|e| {
            LockError::acquisition(&path, "cannot create runtime directory", e)
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::acquisition(&path, "cannot open lock file", e))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                info!("Acquired instance lock {}", path.display());
                Ok(Self {
                    path,
                    state: InstanceState::Primary,
                    file: Some(file),
                })
            }
            Err(e) if is_contended(&e) => {
                info!("Instance lock {} is held by another process", path.display());
                Ok(Self {
                    path,
                    state: InstanceState::Secondary,
                    file: None,
                })
            }
            Err(e) => Err(LockError::acquisition(&path, "cannot lock instance file", e)),
        }
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn is_primary(&self) -> bool {
        self.state.is_primary()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Give up the claim. Safe to call any number of times.
    pub fn release(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        if let Err(e) = FileExt::unlock(&file) {
            warn!("Failed to unlock {}: {e}", self.path.display());
        }
        debug!("Released instance lock {}", self.path.display());
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_contended(error: &IoError) -> bool {
    error.kind() == ErrorKind::WouldBlock
        || error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
