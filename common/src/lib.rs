//! Domain models for the Commotion launcher.
//!
//! This crate contains the plain data that crosses component boundaries:
//! the application key naming an instance group, the text message exchanged
//! between launches, and the run level / instance state enums. Values are
//! validated on construction and carry no behavior beyond that.
//!
//! ## Architecture
//!
//! - **common** (this crate): Pure data structures and error location tracking
//! - **launch-core**: Instance lock, messaging and lifecycle logic
//! - **commotion**: Binary wiring CLI, logging and the window surface together

pub mod application_key;
pub mod error;
pub mod instance_state;
pub mod message;
pub mod run_level;

#[cfg(test)]
mod tests;

pub use application_key::{ApplicationKey, DEFAULT_APPLICATION_KEY, MAX_FILE_STEM_LEN};
pub use error::error_location::ErrorLocation;
pub use error::model_error::ModelError;
pub use instance_state::InstanceState;
pub use message::{MAX_MESSAGE_BYTES, Message, RESTART_MESSAGE, SHOW_MAIN_MESSAGE};
pub use run_level::RunLevel;
