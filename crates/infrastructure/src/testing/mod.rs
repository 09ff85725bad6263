//! Declarative test suite execution.
//!
//! This module runs `TestSuite`s through the API client and evaluates each
//! case's expectations with the assertion layer.

mod json_path;
mod runner;

pub use json_path::{JsonPathError, query_json_path};
pub use runner::SuiteRunner;
