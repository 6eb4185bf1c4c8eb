pub mod config;
pub mod ipc;
pub mod lifecycle;
pub mod lock;

use thiserror::Error;

/// Failures that abort startup of the launcher.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Lock(#[from] lock::LockError),

    #[error(transparent)]
    Ipc(#[from] ipc::IpcError),

    #[error(transparent)]
    Lifecycle(#[from] lifecycle::LifecycleError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
