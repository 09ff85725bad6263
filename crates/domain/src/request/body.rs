//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// Payload attached to a request descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// A JSON document, serialized to text right before transmission
    Json(serde_json::Value),
}

impl RequestBody {
    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// Returns whether there is no payload.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the JSON payload, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::None => None,
            Self::Json(value) => Some(value),
        }
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}
