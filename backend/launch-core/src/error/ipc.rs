use common::{ErrorLocation, ModelError};

use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

/// Failures on the message channel.
///
/// `Bind` is fatal for a primary (it holds the lock but cannot serve). All other
/// variants are recoverable and never leave the server or client.
#[derive(Debug, ThisError)]
pub enum IpcError {
    #[error("Bind Error: {message} {location}")]
    Bind {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connection Error: {message} {location}")]
    Connection {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {operation} exceeded {timeout:?} {location}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("Read Error: {message} {location}")]
    Read {
        message: String,
        location: ErrorLocation,
    },

    #[error("Write Error: {message} {location}")]
    Write {
        message: String,
        location: ErrorLocation,
    },

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },
}

impl IpcError {
    #[track_caller]
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        IpcError::Timeout {
            operation,
            timeout,
            location: ErrorLocation::here(),
        }
    }
}

impl From<ModelError> for IpcError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        IpcError::Decode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
