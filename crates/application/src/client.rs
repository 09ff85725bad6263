//! API client wrapper
//!
//! Turns a [`RequestSpec`] into a prepared wire request, runs it through an
//! [`HttpClient`] under a deadline, and normalizes the outcome into either a
//! [`ResponseEnvelope`] or an [`ApiError`].

use std::sync::Arc;

use apiprobe_domain::ClientConfig;
use apiprobe_domain::request::{
    Header, Headers, HttpMethod, PreparedRequest, QueryParams, RequestBody, RequestSpec,
};
use apiprobe_domain::response::{ErrorEnvelope, RawResponse, ResponseData, ResponseEnvelope};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::ports::{HttpClient, HttpClientError};

/// HTTP client wrapper bound to one configuration.
///
/// Calls are independent: the wrapper holds no per-request state and never
/// retries.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("https://pokeapi.co")?;
/// let client = ApiClient::new(Arc::new(ReqwestHttpClient::new()?), config);
///
/// let response = client.get("/api/v2/pokemon/88", QueryParams::new()).await?;
/// assert_eq!(response.data.get("name"), Some(&json!("grimer")));
/// ```
pub struct ApiClient<C: HttpClient> {
    http: Arc<C>,
    config: ClientConfig,
}

impl<C: HttpClient> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            config: self.config.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Creates a client over the given transport.
    pub const fn new(http: Arc<C>, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Returns the configuration this client was built with.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves `endpoint` against the base URL and appends every query
    /// parameter that has a value, in insertion order.
    ///
    /// The base URL's path is kept: `https://host/v1` + `/users` gives
    /// `https://host/v1/users`. Absolute endpoints are used as-is.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the result does not parse.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> ApiResult<Url> {
        let joined = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            let base = self.config.base_url.as_str().trim_end_matches('/');
            let path = endpoint.trim_start_matches('/');
            if path.is_empty() {
                base.to_string()
            } else {
                format!("{base}/{path}")
            }
        };

        let mut url =
            Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{e}: {joined}")))?;

        let present: Vec<_> = params.present().collect();
        if !present.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &present {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Merges per-call headers over the configured defaults and injects the
    /// bearer token when an API key is configured.
    pub fn build_headers(&self, per_call: &Headers) -> Headers {
        let mut headers = self.config.default_headers.merged_with(per_call);
        if let Some(api_key) = &self.config.api_key {
            headers.insert(Header::new("Authorization", format!("Bearer {api_key}")));
        }
        headers
    }

    /// Resolves a request descriptor into the request put on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the body cannot be
    /// serialized.
    pub fn prepare(&self, request: &RequestSpec) -> ApiResult<PreparedRequest> {
        let url = self.build_url(&request.endpoint, &request.params)?;
        let headers = self.build_headers(&request.headers);

        let body = match &request.body {
            RequestBody::None => None,
            RequestBody::Json(_) if !request.method.accepts_body() => {
                debug!(method = %request.method, "dropping payload for bodiless method");
                None
            }
            RequestBody::Json(value) => {
                Some(serde_json::to_string(value).map_err(ApiError::Serialization)?)
            }
        };

        Ok(PreparedRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    /// Issues a request and normalizes the outcome.
    ///
    /// Exactly one of three things happens: the transport answers, the
    /// timeout elapses, or the transport fails. On timeout the in-flight
    /// exchange is dropped and a 408 [`ApiError::Timeout`] is returned.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for non-2xx responses, with the body attached
    /// - `ApiError::Timeout` when the configured timeout elapses
    /// - `ApiError::Transport` for network failures
    /// - `ApiError::InvalidUrl` / `Serialization` / `Decode` for local failures
    #[instrument(skip_all, fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn request(&self, request: &RequestSpec) -> ApiResult<ResponseEnvelope> {
        let prepared = self.prepare(request)?;
        debug!(url = %prepared.url, "sending request");

        let timeout = self.config.timeout;
        let raw = tokio::select! {
            result = self.http.execute(&prepared) => result.map_err(|e| self.transport_error(e))?,
            () = tokio::time::sleep(timeout) => {
                warn!(url = %prepared.url, timeout_ms = timeout.as_millis(), "request aborted after timeout");
                return Err(ApiError::timeout(timeout));
            }
        };

        if raw.is_success() {
            let data = decode(&raw).map_err(ApiError::Decode)?;
            debug!(status = raw.status, "request succeeded");
            Ok(ResponseEnvelope::new(raw.status, raw.status_text, data, raw.url))
        } else {
            error!("API Error: {} - {}", raw.status, raw.status_text);
            let data = decode(&raw).unwrap_or_else(|_| ResponseData::Text(raw.body_text()));
            Err(ApiError::Status(ErrorEnvelope::new(
                raw.status,
                raw.status_text,
                data,
            )))
        }
    }

    /// GET with query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, endpoint: &str, params: QueryParams) -> ApiResult<ResponseEnvelope> {
        self.request(&RequestSpec::get(endpoint).with_params(params))
            .await
    }

    /// POST with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> ApiResult<ResponseEnvelope> {
        self.send_json(HttpMethod::Post, endpoint, data).await
    }

    /// PUT with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> ApiResult<ResponseEnvelope> {
        self.send_json(HttpMethod::Put, endpoint, data).await
    }

    /// PATCH with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> ApiResult<ResponseEnvelope> {
        self.send_json(HttpMethod::Patch, endpoint, data).await
    }

    /// DELETE without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, endpoint: &str) -> ApiResult<ResponseEnvelope> {
        self.request(&RequestSpec::new(HttpMethod::Delete, endpoint))
            .await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: &T,
    ) -> ApiResult<ResponseEnvelope> {
        let body = serde_json::to_value(data).map_err(ApiError::Serialization)?;
        self.request(&RequestSpec::new(method, endpoint).with_body(body))
            .await
    }

    fn transport_error(&self, error: HttpClientError) -> ApiError {
        match error {
            HttpClientError::Timeout => {
                warn!(timeout_ms = self.config.timeout.as_millis(), "transport timed out");
                ApiError::timeout(self.config.timeout)
            }
            other => ApiError::Transport(other),
        }
    }
}

/// Chooses the JSON or text branch from the declared content type.
///
/// An empty JSON body decodes to `null`.
fn decode(raw: &RawResponse) -> Result<ResponseData, serde_json::Error> {
    if !raw.is_json() {
        return Ok(ResponseData::Text(raw.body_text()));
    }
    if raw.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseData::Json(serde_json::Value::Null));
    }
    serde_json::from_slice(&raw.body).map(ResponseData::Json)
}
