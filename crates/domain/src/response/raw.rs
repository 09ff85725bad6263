//! Raw transport response

use std::collections::HashMap;
use std::time::Duration;

use super::StatusCode;

/// What a transport hands back after a completed exchange, before any
/// decoding or success/failure classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase (e.g., "OK", "Not Found").
    pub status_text: String,
    /// Response headers as a map.
    pub headers: HashMap<String, String>,
    /// Response body as raw bytes.
    pub body: Vec<u8>,
    /// Final URL after redirects.
    pub url: String,
    /// Time from send to full body receipt.
    pub duration: Duration,
    /// Content-Type header value (extracted for convenience).
    pub content_type: Option<String>,
}

impl RawResponse {
    /// Creates a `RawResponse` from raw response data.
    ///
    /// The reason phrase falls back to the canonical phrase for the code.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        url: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let status_code = status.into();
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());

        Self {
            status: status_code.as_u16(),
            status_text: status_code.reason_phrase().to_string(),
            headers,
            body,
            url: url.into(),
            duration,
            content_type,
        }
    }

    /// Overrides the reason phrase with the one the server sent.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Returns the status as a `StatusCode` struct.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// Returns true if the declared content type is JSON
    /// (`application/json` or a `+json` structured suffix).
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|ct| ct.contains("application/json") || ct.contains("+json"))
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
