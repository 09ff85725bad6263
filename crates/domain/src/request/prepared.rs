//! Fully resolved wire request

use url::Url;

use super::{Headers, HttpMethod};

/// A request ready to hand to a transport: absolute URL, final header set,
/// and the body already serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: Url,
    /// Headers after merging defaults, overrides and auth
    pub headers: Headers,
    /// Serialized body, if the method carries one
    pub body: Option<String>,
}
