use crate::config::{AppConfig, default_log_file};
use crate::error::config::ConfigError;

use common::{ApplicationKey, Message, RunLevel};

use std::path::PathBuf;
use std::time::Duration;

/// Everything the launcher needs, already validated.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub key: ApplicationKey,
    pub run_level: RunLevel,
    /// Message a secondary forwards; `None` forwards `showMain`.
    pub message: Option<Message>,
    pub ipc_timeout: Duration,
    pub runtime_dir: Option<PathBuf>,
    pub verbosity: u8,
    pub log_file: PathBuf,
}

impl LaunchSettings {
    /// Build settings from a loaded config. No message is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let key = ApplicationKey::new(config.key.clone())
            .map_err(|e| ConfigError::validation(e.to_string()))?;
        let run_level = if config.daemon {
            RunLevel::Daemon
        } else {
            RunLevel::Full
        };

        Ok(Self {
            key,
            run_level,
            message: None,
            ipc_timeout: Duration::from_millis(config.ipc_timeout_ms),
            runtime_dir: config.runtime_dir.clone(),
            verbosity: config.verbosity,
            log_file: config.log_file.clone().unwrap_or_else(default_log_file),
        })
    }
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            key: ApplicationKey::default(),
            run_level: RunLevel::default(),
            message: None,
            ipc_timeout: crate::DEFAULT_IPC_TIMEOUT,
            runtime_dir: None,
            verbosity: crate::config::DEFAULT_VERBOSITY,
            log_file: default_log_file(),
        }
    }
}
