//! Launch coordination for the Commotion client.
//!
//! At most one process per [`ApplicationKey`](common::ApplicationKey) owns the
//! client. Later launches find the instance lock held, forward a message to the
//! running primary over a local channel and exit. The primary routes those
//! messages to its lifecycle manager, which brings windows up and down.

pub mod application;
pub mod config;
pub mod error;
pub mod instance;
pub mod ipc;
pub mod lifecycle;
pub mod router;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub const APPLICATION_NAME: &str = "Commotion Client";
pub const APPLICATION_SLUG: &str = "commotion-client";
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ORGANIZATION_NAME: &str = "The Open Technology Institute";
pub const ORGANIZATION_DOMAIN: &str = "commotionwireless.net";

pub const LOCK_FILE_EXTENSION: &str = ".lock";
pub const CHANNEL_FILE_EXTENSION: &str = ".sock";
pub const DEFAULT_LOG_FILE_NAME: &str = const_format::concatcp!(APPLICATION_SLUG, ".log");

pub const DEFAULT_IPC_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_IPC_TIMEOUT: Duration = Duration::from_millis(DEFAULT_IPC_TIMEOUT_MS);
