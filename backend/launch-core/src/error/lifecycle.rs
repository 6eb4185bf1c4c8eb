use common::{ErrorLocation, RunLevel};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Failure reported by the main window collaborator.
#[derive(Debug, ThisError)]
#[error("Window Error: {message} {location}")]
pub struct WindowError {
    pub message: String,
    pub location: ErrorLocation,
}

impl WindowError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Failure reported by the controller collaborator.
#[derive(Debug, ThisError)]
#[error("Controller Error: {message} {location}")]
pub struct ControllerError {
    pub message: String,
    pub location: ErrorLocation,
}

impl ControllerError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Errors returned by lifecycle operations.
///
/// `Initialization` and `ForcedTeardown` are fatal: the process has to halt.
/// Everything else leaves the manager in its previous state.
#[derive(Debug, ThisError)]
pub enum LifecycleError {
    #[error("Initialization Error ({level}): {message} {location}")]
    Initialization {
        level: RunLevel,
        message: String,
        location: ErrorLocation,
    },

    #[error("Window Teardown Error: {message} {location}")]
    WindowTeardown {
        message: String,
        location: ErrorLocation,
    },

    #[error("Controller Teardown Error: {message} {location}")]
    ControllerTeardown {
        message: String,
        location: ErrorLocation,
    },

    #[error("Forced Teardown Error: {message} {location}")]
    ForcedTeardown {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Transition Error: {message} {location}")]
    InvalidTransition {
        message: String,
        location: ErrorLocation,
    },

    #[error("Window Error: {message} {location}")]
    Window {
        message: String,
        location: ErrorLocation,
    },

    #[error("Lifecycle Actor Unavailable: {message} {location}")]
    ActorUnavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl LifecycleError {
    #[track_caller]
    pub fn initialization(level: RunLevel, message: impl Into<String>) -> Self {
        LifecycleError::Initialization {
            level,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        LifecycleError::InvalidTransition {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn actor_unavailable(message: impl Into<String>) -> Self {
        LifecycleError::ActorUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True when the process must terminate with a non-zero status.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LifecycleError::Initialization { .. } | LifecycleError::ForcedTeardown { .. }
        )
    }
}

impl From<WindowError> for LifecycleError {
    #[track_caller]
    fn from(error: WindowError) -> Self {
        LifecycleError::Window {
            message: error.message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
