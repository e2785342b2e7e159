//! Error types for the hockey tracker.

use thiserror::Error;

/// The main error type for the hockey tracker.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (entry store, config file, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP errors talking to the catalog (connect, status, body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Network connectivity errors not raised by the HTTP client itself
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The catalog answered, but not with what we asked for
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input outside the presented enumeration, or of the wrong shape
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// A lookup came back empty where a choice was expected
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Operation not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No stored entry with the given id
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new unexpected payload error.
    pub fn unexpected_payload(msg: impl Into<String>) -> Self {
        Self::UnexpectedPayload(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error for a form field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new empty result error.
    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    /// Create a new invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Check if this error came from fetching the upstream catalog.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Network(_) | Self::Serialization(_) | Self::UnexpectedPayload(_)
        )
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Network(_) | Self::Validation { .. } | Self::EmptyResult(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        assert!(Error::network("connection reset").is_upstream());
        assert!(Error::unexpected_payload("no data").is_upstream());
        assert!(!Error::validation("club_name", "invalid_choice").is_upstream());
        assert!(!Error::config("bad file").is_upstream());
    }

    #[test]
    fn test_validation_message() {
        let err = Error::validation("team_name", "invalid_choice");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'team_name': invalid_choice"
        );
        assert!(err.is_recoverable());
    }
}
