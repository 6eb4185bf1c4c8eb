use std::fmt;

/// Whether this process owns the instance lock for its key.
///
/// Decided once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Primary,
    Secondary,
}

impl InstanceState {
    pub fn is_primary(&self) -> bool {
        matches!(self, InstanceState::Primary)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceState::Primary => f.write_str("primary"),
            InstanceState::Secondary => f.write_str("secondary"),
        }
    }
}
