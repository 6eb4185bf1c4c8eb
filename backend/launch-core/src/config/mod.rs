//! Launcher configuration.
//!
//! [`AppConfig`] is the on-disk JSON file; [`LaunchSettings`] is the validated
//! result after command-line overrides, handed to
//! [`Application::start`](crate::application::Application::start).

mod settings;

pub use settings::LaunchSettings;

use crate::error::config::ConfigError;
use crate::{APPLICATION_SLUG, DEFAULT_IPC_TIMEOUT_MS, DEFAULT_LOG_FILE_NAME};

use common::{DEFAULT_APPLICATION_KEY, ErrorLocation};

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const MAX_IPC_TIMEOUT_MS: u64 = 60_000;

pub const MIN_VERBOSITY: u8 = 1;
pub const MAX_VERBOSITY: u8 = 5;
pub const DEFAULT_VERBOSITY: u8 = 2;

// ============================================
// CONFIG STRUCT
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Application key naming the instance lock and message channel.
    #[serde(default = "default_key")]
    pub key: String,

    /// Log verbosity, 1 (errors only) to 5 (trace).
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,

    /// Log file; `None` uses a file in the temp directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Start in daemon run level.
    #[serde(default)]
    pub daemon: bool,

    /// Bound on every channel wait, in milliseconds.
    #[serde(default = "default_ipc_timeout_ms")]
    pub ipc_timeout_ms: u64,

    /// Directory for the lock file and socket; `None` uses the per-user runtime dir.
    #[serde(default)]
    pub runtime_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            key: default_key(),
            verbosity: DEFAULT_VERBOSITY,
            log_file: None,
            daemon: false,
            ipc_timeout_ms: DEFAULT_IPC_TIMEOUT_MS,
            runtime_dir: None,
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_key() -> String {
    DEFAULT_APPLICATION_KEY.to_string()
}
fn default_verbosity() -> u8 {
    DEFAULT_VERBOSITY
}
fn default_ipc_timeout_ms() -> u64 {
    DEFAULT_IPC_TIMEOUT_MS
}

/// `<config_dir>/commotion-client`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APPLICATION_SLUG))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: "platform has no user config directory".to_string(),
        })
}

/// `<temp>/commotion-client/commotion-client.log`.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir()
        .join(APPLICATION_SLUG)
        .join(DEFAULT_LOG_FILE_NAME)
}

// ============================================
// IMPLEMENTATION
// ============================================

impl AppConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(AppConfig)` if loaded successfully or defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable, corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.key.trim().is_empty() {
            return Err(ConfigError::validation("key cannot be empty"));
        }

        if !(MIN_VERBOSITY..=MAX_VERBOSITY).contains(&self.verbosity) {
            return Err(ConfigError::validation(format!(
                "Invalid verbosity: {} (must be {MIN_VERBOSITY}-{MAX_VERBOSITY})",
                self.verbosity
            )));
        }

        if self.ipc_timeout_ms == 0 || self.ipc_timeout_ms > MAX_IPC_TIMEOUT_MS {
            return Err(ConfigError::validation(format!(
                "Invalid ipc_timeout_ms: {} (must be 1-{MAX_IPC_TIMEOUT_MS})",
                self.ipc_timeout_ms
            )));
        }

        Ok(())
    }
}
