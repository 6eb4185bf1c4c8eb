use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// The instance lock could neither be taken nor observed as held.
///
/// Always fatal: startup must stop instead of guessing Primary or Secondary.
#[derive(Debug, ThisError)]
pub enum LockError {
    #[error("Lock Acquisition Error: {path}: {message} {location}")]
    Acquisition {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl LockError {
    #[track_caller]
    pub fn acquisition(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LockError::Acquisition {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::here(),
            source,
        }
    }
}
