//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It only moves bytes: status
//! classification, body decoding and the request deadline belong to the
//! client wrapper in the application layer.

use std::collections::HashMap;
use std::time::Instant;

use apiprobe_application::ports::{HttpClient, HttpClientError};
use apiprobe_domain::request::{HttpMethod, PreparedRequest};
use apiprobe_domain::response::RawResponse;
use reqwest::{Client, Method};
use tracing::trace;

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "apiprobe/<version>"
    ///
    /// No request timeout is set here.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }

    /// Maps reqwest errors to transport errors.
    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout;
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = format!("{error:?}");
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message: error.to_string(),
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(error.to_string());
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidRequest(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &PreparedRequest) -> Result<RawResponse, HttpClientError> {
        let start = Instant::now();

        let mut builder = self.client.request(
            Self::to_reqwest_method(request.method),
            request.url.clone(),
        );
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status().as_u16();
        let status_text = response.status().canonical_reason().unwrap_or_default();
        let url = response.url().to_string();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
            .to_vec();

        let duration = start.elapsed();
        trace!(status, bytes = body.len(), ?duration, "exchange complete");

        Ok(RawResponse::new(status, headers, body, url, duration).with_status_text(status_text))
    }
}
