//! Apiprobe Domain - Core types
//!
//! This crate defines the domain model for the Apiprobe API test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{DomainError, DomainResult};
pub use testing::{
    CaseResult, DEFAULT_MAX_RESPONSE_MS, Expectation, ExpectationResult, SchemaViolation,
    SuiteResults, TestCase, TestSuite,
};
