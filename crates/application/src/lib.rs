//! Apiprobe Application - Client wrapper and assertions
//!
//! This crate holds the request/response pipeline and the assertion layer.
//! It talks to the outside world only through the ports in [`ports`].

pub mod assertions;
pub mod client;
pub mod error;
pub mod ports;

pub use assertions::{
    AssertionError, AssertionResult, Assertions, DEFAULT_SCHEMA_DRAFT, with_default_draft,
};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
