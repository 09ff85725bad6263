//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building requests or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is not a valid HTTP token.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contains forbidden characters.
    #[error("invalid header value for '{name}'")]
    InvalidHeaderValue {
        /// Name of the offending header.
        name: String,
    },

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
