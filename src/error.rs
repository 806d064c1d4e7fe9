//! Error types for session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Identifier generation failed (entropy source unavailable or
    /// identifier space exhausted).
    #[error("Identifier generation failed: {0}")]
    Generation(String),

    /// The request carries no session cookie.
    #[error("No session cookie present on the request")]
    NoSession,

    /// Expected storage file is missing: the session was never persisted
    /// or was already destroyed.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Filesystem failure other than not-found.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State contains a value the codec cannot represent.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Stored bytes are malformed, truncated, or reference an
    /// unregistered record type.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl SessionError {
    /// Whether this error means "session does not exist" rather than a
    /// hard failure. Callers typically start a fresh session on these.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NoSession | SessionError::NotFound(_))
    }
}
