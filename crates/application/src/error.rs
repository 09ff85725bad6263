//! Client wrapper error types

use std::time::Duration;

use apiprobe_domain::response::ErrorEnvelope;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Why an API call did not produce a response envelope.
///
/// `Status` and `Timeout` carry an [`ErrorEnvelope`] so callers can assert
/// on the status of a failed call; see [`ApiError::response`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP Error {}", .0.status)]
    Status(ErrorEnvelope),

    /// The request was aborted because the configured timeout elapsed.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
        /// Synthesized 408 envelope.
        response: ErrorEnvelope,
    },

    /// Network-level failure other than a timeout.
    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// The endpoint could not be resolved into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request payload could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A 2xx response declared JSON but its body did not parse.
    #[error("failed to decode JSON response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Builds the timeout error for the given duration.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: timeout.as_millis() as u64,
            response: ErrorEnvelope::request_timeout(),
        }
    }

    /// The error envelope, for failures that have an HTTP status.
    #[must_use]
    pub const fn response(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Status(envelope) | Self::Timeout { response: envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Shorthand for the envelope's status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Returns true if this is the timeout variant.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
