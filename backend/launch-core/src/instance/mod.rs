//! Single-instance decision for one application key.
//!
//! [`InstanceLock`] answers "am I primary?" exactly once at startup and
//! [`Endpoint`] derives the OS names (lock file, channel) from the key.

mod endpoint;
mod lock;

pub use endpoint::{Endpoint, default_runtime_dir};
pub use lock::InstanceLock;
