//! JSON helpers for schema documents and run reports.

mod json;

pub use json::*;
