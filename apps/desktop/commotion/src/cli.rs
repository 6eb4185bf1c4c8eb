//! Command line surface of the launcher.
//!
//! Flags override the values loaded from `config.json`.

use crate::error::CommotionError;

use launch_core::config::{AppConfig, LaunchSettings, MAX_VERBOSITY, MIN_VERBOSITY};

use common::{ErrorLocation, Message};

use std::panic::Location;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "commotion", version, about = "Commotion Client")]
pub struct Cli {
    /// Log verbosity, 1 (errors only) to 5 (trace)
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u8).range(i64::from(MIN_VERBOSITY)..=i64::from(MAX_VERBOSITY))
    )]
    pub verbose: Option<u8>,

    /// Log file
    #[arg(short, long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Start without showing the main window
    #[arg(short, long)]
    pub daemon: bool,

    /// Message to forward to an already running client
    #[arg(short, long, value_name = "STR")]
    pub message: Option<String>,

    /// Application key shared by all instances that should act as one
    #[arg(short, long, value_name = "STR")]
    pub key: Option<String>,

    /// Directory holding config.json
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    /// Apply flags on top of `config`. Flags that were not given leave the
    /// config value alone; `--daemon` can only turn daemon mode on.
    pub fn merge(&self, mut config: AppConfig) -> AppConfig {
        if let Some(verbosity) = self.verbose {
            config.verbosity = verbosity;
        }
        if let Some(log_file) = &self.logfile {
            config.log_file = Some(log_file.clone());
        }
        if self.daemon {
            config.daemon = true;
        }
        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        config
    }

    /// Merge with `config` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`CommotionError::Config`] for a blank key, an oversize message
    /// or any other value the config validation rejects.
    pub fn into_settings(self, config: AppConfig) -> Result<LaunchSettings, CommotionError> {
        let merged = self.merge(config);
        let mut settings = LaunchSettings::from_config(&merged)?;

        if let Some(text) = self.message {
            let message = Message::new(text).map_err(|e| CommotionError::Config {
                message: format!("Invalid --message: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
            settings.message = Some(message);
        }

        Ok(settings)
    }
}
