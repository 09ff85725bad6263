//! HTTP transport port

use std::future::Future;

use apiprobe_domain::request::PreparedRequest;
use apiprobe_domain::response::RawResponse;
use thiserror::Error;

/// Network-level failures a transport can report.
///
/// These never carry an HTTP status; a response with any status, including
/// 4xx and 5xx, is a successful transport exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The transport gave up waiting on its own.
    #[error("transport timed out")]
    Timeout,

    /// DNS resolution failed.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection-level failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything the adapter could not classify.
    #[error("{0}")]
    Other(String),
}

/// Port for putting a prepared request on the wire.
///
/// Implementations must not classify statuses or decode bodies; the client
/// wrapper owns that. Dropping the returned future must abort the exchange.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn execute(
        &self,
        request: &PreparedRequest,
    ) -> impl Future<Output = Result<RawResponse, HttpClientError>> + Send;
}
