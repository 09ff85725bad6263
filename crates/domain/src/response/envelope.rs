//! Normalized response and error envelopes

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StatusCode;

/// Decoded response body.
///
/// Exactly one branch is chosen per response, from the content type the
/// server declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Body declared as JSON and parsed.
    Json(serde_json::Value),
    /// Any other body, kept as text.
    Text(String),
}

impl ResponseData {
    /// Returns the parsed JSON, if this is the JSON branch.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text, if this is the text branch.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Looks up a top-level field of a JSON object body.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.as_json().and_then(|v| v.get(key))
    }

    /// Returns the body as a JSON value; text bodies become JSON strings.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A completed 2xx exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Decoded body.
    pub data: ResponseData,
    /// Whether the status is in the 2xx range.
    pub ok: bool,
    /// Final URL of the exchange.
    pub url: String,
}

impl ResponseEnvelope {
    /// Creates an envelope; `ok` is derived from the status.
    #[must_use]
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        data: ResponseData,
        url: impl Into<String>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            data,
            ok: StatusCode::new(status).is_success(),
            url: url.into(),
        }
    }
}

/// The response part of a failed call: upstream status and body, or a
/// synthesized 408 when the client timed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Body of the failed response, absent for synthesized envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl ErrorEnvelope {
    /// Creates an envelope mirroring an upstream response.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, data: ResponseData) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            data: Some(data),
        }
    }

    /// The envelope reported when the client aborts a request on timeout.
    #[must_use]
    pub fn request_timeout() -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT.as_u16(),
            status_text: StatusCode::REQUEST_TIMEOUT.reason_phrase().to_string(),
            data: None,
        }
    }
}

/// Anything that carries an HTTP status the assertion layer can check.
pub trait HasStatus {
    /// Returns the HTTP status code.
    fn status(&self) -> u16;
}

impl HasStatus for ResponseEnvelope {
    fn status(&self) -> u16 {
        self.status
    }
}

impl HasStatus for ErrorEnvelope {
    fn status(&self) -> u16 {
        self.status
    }
}

impl<T: HasStatus + ?Sized> HasStatus for &T {
    fn status(&self) -> u16 {
        (**self).status()
    }
}
