//! Error types for Discord webhook SDK operations.
//!
//! Only faults are modelled here: transport failures, undecodable responses
//! and invalid input. Remote rejections (non-success HTTP statuses) and
//! missing-webhook preconditions are ordinary values, see
//! [`ApiOutcome`](crate::client::ApiOutcome).

use thiserror::Error;

/// Errors raised while talking to the Discord REST API.
///
/// These represent conditions where no meaningful outcome could be produced:
/// the request never completed, the response could not be decoded, or the
/// client was asked to do something with malformed input.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error (network, TLS, timeout, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to encode a request body or decode a response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A webhook or API URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The client could not be configured (HTTP client construction, runtime startup).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A success response was missing data the operation depends on.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Caller supplied input that failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Check if this error represents a transient condition.
    ///
    /// The client never retries on its own; this is exposed so callers can
    /// build their own policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Json(_) => false,
            Self::InvalidUrl(_) => false,
            Self::Configuration { .. } => false,
            Self::UnexpectedResponse { .. } => false,
            Self::Validation(_) => false,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    Required { field: String },

    /// A field has an invalid format.
    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
