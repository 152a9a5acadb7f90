//! Error types for idlesweep-core.

use thiserror::Error;

/// Result type alias using idlesweep-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for sweep operations
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    // Directory errors
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // Event payload errors
    #[error("Invalid alarm event: {0}")]
    InvalidEvent(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Covers network-level failures and throttling/server-side status codes.
    /// Everything else is handed to the caller on the first attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_is_transient() {
        assert!(Error::api(429, "slow down").is_transient());
        assert!(Error::api(503, "unavailable").is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        assert!(!Error::api(400, "bad request").is_transient());
        assert!(!Error::SessionNotFound("canvas/default".into()).is_transient());
        assert!(!Error::InvalidEvent("missing field".into()).is_transient());
    }
}
