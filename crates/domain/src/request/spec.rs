//! Request descriptor type

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod, QueryParams, RequestBody};

/// Everything a caller specifies for a single API call.
///
/// The endpoint is relative to the configured base URL; headers here are the
/// per-call overrides that get merged over the client defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path, e.g. `/api/v2/pokemon/88`
    pub endpoint: String,
    /// Query parameters, appended in insertion order
    #[serde(default)]
    pub params: QueryParams,
    /// Per-call headers
    #[serde(default)]
    pub headers: Headers,
    /// Optional payload
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a request descriptor with no params, headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: QueryParams::new(),
            headers: Headers::new(),
            body: RequestBody::None,
        }
    }

    /// Creates a GET request descriptor.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Adds a per-call header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.with(name, value);
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let req = RequestSpec::get("/api/v2/pokemon/88");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.endpoint, "/api/v2/pokemon/88");
        assert!(req.params.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_builder() {
        let req = RequestSpec::new(HttpMethod::Post, "/users")
            .with_header("X-Request-Id", "42")
            .with_body(json!({"name": "Test User"}));

        assert_eq!(req.headers.get("x-request-id"), Some("42"));
        assert_eq!(req.body.as_json(), Some(&json!({"name": "Test User"})));
    }
}
