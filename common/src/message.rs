//! Text payload exchanged between a secondary launch and the primary.

use crate::ModelError;

use std::fmt;

/// Upper bound on a message payload, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Asks the primary to surface its main window.
pub const SHOW_MAIN_MESSAGE: &str = "showMain";

/// Asks the primary to restart its window and controller.
pub const RESTART_MESSAGE: &str = "restart";

/// A single UTF-8 message. Equality is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    #[track_caller]
    pub fn new(text: impl Into<String>) -> Result<Self, ModelError> {
        let text = text.into();
        if text.len() > MAX_MESSAGE_BYTES {
            return Err(ModelError::validation(format!(
                "message is {} bytes, maximum is {MAX_MESSAGE_BYTES}",
                text.len()
            )));
        }
        Ok(Self(text))
    }

    /// Decode a payload read off the wire.
    #[track_caller]
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ModelError> {
        if bytes.len() > MAX_MESSAGE_BYTES {
            return Err(ModelError::validation(format!(
                "payload is {} bytes, maximum is {MAX_MESSAGE_BYTES}",
                bytes.len()
            )));
        }
        let text = String::from_utf8(bytes)
            .map_err(|e| ModelError::decode(format!("payload is not valid UTF-8: {e}")))?;
        Ok(Self(text))
    }

    pub fn show_main() -> Self {
        Self(SHOW_MAIN_MESSAGE.to_string())
    }

    pub fn restart() -> Self {
        Self(RESTART_MESSAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
