//! # Gate Error Types
//!
//! Typed error handling for checkout and account operations.
//! Every fallible operation in the workspace returns `Result<T, GateError>`.

use thiserror::Error;

/// Message returned to callers for failures whose details stay in the logs.
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Core error type for checkout and account operations
#[derive(Debug, Error)]
pub enum GateError {
    /// A required request field was absent or empty
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// Request body could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status; body is relayed verbatim
    #[error("{body}")]
    Upstream { status: u16, body: String },

    /// The provider answered 2xx but without a field we rely on
    #[error("Provider response missing {0}")]
    MissingResponseField(&'static str),

    /// Provider or backend body could not be parsed
    #[error("Failed to parse provider response: {0}")]
    Serialization(String),

    /// No usable session for an operation that needs one
    #[error("{0}")]
    Unauthorized(String),

    /// Account backend failed while resolving the session
    #[error("Account backend error: {0}")]
    Backend(String),

    /// Network/HTTP error communicating with an external service
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::MissingField(_) => 400,
            GateError::InvalidRequest(_) => 400,
            GateError::Configuration(_) => 500,
            GateError::Upstream { status, .. } => *status,
            GateError::MissingResponseField(_) => 500,
            GateError::Serialization(_) => 500,
            GateError::Unauthorized(_) => 401,
            GateError::Backend(_) => 502,
            GateError::Network(_) => 500,
            GateError::Internal(_) => 500,
        }
    }

    /// Provider status to echo back in the error body, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GateError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message safe to hand to the caller.
    ///
    /// Transport and internal failures collapse to [`GENERIC_SERVER_ERROR`].
    pub fn public_message(&self) -> String {
        match self {
            GateError::Network(_) | GateError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for gate operations
pub type GateResult<T> = Result<T, GateError>;
