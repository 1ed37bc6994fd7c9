//! Error types for focusdeck.

use thiserror::Error;

/// Errors that can occur outside the timer state machine.
///
/// The state machine itself never fails; these cover the boundaries around
/// it: configuration, persistence, terminal handling and input parsing.
#[derive(Debug, Error)]
pub enum FocusError {
    /// Configuration could not be read, written or validated.
    #[error("configuration error: {0}")]
    Config(String),

    /// The session database failed.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A phase name did not match any known phase.
    #[error("unknown phase '{0}' (expected work, short or long)")]
    InvalidPhase(String),

    /// A duration string could not be parsed or was out of range.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The terminal could not be set up or drawn to.
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl From<serde_json::Error> for FocusError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON: {e}"))
    }
}

impl From<serde_yaml::Error> for FocusError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(format!("YAML: {e}"))
    }
}

impl From<rusqlite::Error> for FocusError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_phase_message() {
        let err = FocusError::InvalidPhase("nap".to_string());
        assert_eq!(
            err.to_string(),
            "unknown phase 'nap' (expected work, short or long)"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: FocusError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FocusError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: FocusError = json_err.into();
        assert!(matches!(err, FocusError::Parse(_)));
    }
}
