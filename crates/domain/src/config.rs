//! Client configuration
//!
//! Built once at startup and handed to the client; nothing reads the
//! environment after that.

use std::time::Duration;

use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::Headers;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Connection settings shared by every request a client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL endpoints are resolved against.
    pub base_url: Url,
    /// Bearer token injected as `Authorization` when present.
    pub api_key: Option<String>,
    /// How long a request may run before it is aborted.
    pub timeout: Duration,
    /// Headers sent with every request unless overridden per call.
    pub default_headers: Headers,
}

impl ClientConfig {
    /// Creates a configuration with JSON default headers, no API key and
    /// the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if `base_url` does not parse or is
    /// not an http(s) URL.
    pub fn new(base_url: &str) -> DomainResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "base URL must use http or https: {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            default_headers: Headers::json_defaults(),
        })
    }

    /// Sets the API key; blank keys are ignored.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the default headers.
    #[must_use]
    pub fn with_default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = headers;
        self
    }
}
