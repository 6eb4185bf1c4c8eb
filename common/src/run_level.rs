use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating mode of the primary instance.
///
/// `Full` shows the main window. `Daemon` still creates it but keeps it
/// hidden, leaving only a background presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunLevel {
    #[default]
    Full,
    Daemon,
}

impl RunLevel {
    pub fn shows_window(&self) -> bool {
        matches!(self, RunLevel::Full)
    }
}

impl fmt::Display for RunLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLevel::Full => f.write_str("full"),
            RunLevel::Daemon => f.write_str("daemon"),
        }
    }
}
