use launch_core::error::CoreError;
use launch_core::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors that stop the desktop launcher before or during startup.
#[derive(Debug, Error)]
pub enum CommotionError {
    /// Logger could not be installed
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration or command line values were rejected
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Error from launch-core (lock, channel, lifecycle)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}

impl From<CoreError> for CommotionError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        CommotionError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CommotionError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        CommotionError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
