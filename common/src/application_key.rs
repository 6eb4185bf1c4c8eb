//! Identity key shared by the instance lock and the message channel.

use crate::ModelError;

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Key used when neither configuration nor the command line supplies one.
pub const DEFAULT_APPLICATION_KEY: &str = "commotionRocks";

/// Characters of the key kept readable in [`ApplicationKey::file_stem`].
const STEM_PREFIX_CHARS: usize = 24;

/// Digest bytes in [`ApplicationKey::file_stem`], hex encoded to twice as many characters.
const STEM_DIGEST_BYTES: usize = 16;

/// Longest possible [`ApplicationKey::file_stem`]: prefix, `-`, hex digest.
pub const MAX_FILE_STEM_LEN: usize = STEM_PREFIX_CHARS + 1 + STEM_DIGEST_BYTES * 2;

/// Names one logical group of application instances.
///
/// The same key names the instance lock and the message channel, so two
/// launches with equal keys always compete for the same lock and talk over
/// the same channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationKey(String);

impl ApplicationKey {
    /// Build a key, rejecting empty or whitespace-only input.
    #[track_caller]
    pub fn new(key: impl Into<String>) -> Result<Self, ModelError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ModelError::validation("application key must not be empty"));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe, length-bounded form of the key.
    ///
    /// A readable prefix (the first characters of the key, anything other than ASCII
    /// alphanumerics, `-` or `_` turned into `_`) followed by a hex SHA-256
    /// digest of the full key. The digest keeps keys that share a prefix,
    /// such as `team.a` and `team_a`, on different names.
    pub fn file_stem(&self) -> String {
        let prefix: String = self
            .0
            .chars()
            .take(STEM_PREFIX_CHARS)
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let digest = Sha256::digest(self.0.as_bytes());

        format!("{prefix}-{}", hex::encode(&digest[..STEM_DIGEST_BYTES]))
    }
}

impl Default for ApplicationKey {
    fn default() -> Self {
        Self(DEFAULT_APPLICATION_KEY.to_string())
    }
}

impl fmt::Display for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApplicationKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApplicationKey> for String {
    fn from(key: ApplicationKey) -> Self {
        key.0
    }
}
