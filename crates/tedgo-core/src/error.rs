//! Error types for TedGo.

use thiserror::Error;

/// Main error type for TedGo operations.
#[derive(Error, Debug, Clone)]
pub enum TedGoError {
    /// Transaction text did not match any accepted form.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The node could not be reached or answered with an error status.
    #[error("{cause}")]
    Transport { cause: String },

    /// A node call exceeded its deadline.
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Local persistence failed.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The node answered with a payload of the wrong structure.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TedGoError {
    /// Returns true if retrying the same call later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TedGoError::Transport { .. } | TedGoError::Timeout { .. } | TedGoError::Storage { .. }
        )
    }

    /// Shorthand for a transport failure carrying `cause`.
    pub fn transport(cause: impl Into<String>) -> Self {
        TedGoError::Transport {
            cause: cause.into(),
        }
    }
}

/// Convenience Result type for TedGo operations.
pub type Result<T> = std::result::Result<T, TedGoError>;

impl From<serde_json::Error> for TedGoError {
    fn from(err: serde_json::Error) -> Self {
        TedGoError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for TedGoError {
    fn from(err: std::io::Error) -> Self {
        TedGoError::Storage {
            message: err.to_string(),
        }
    }
}
