//! HTTP Response domain types

mod envelope;
mod raw;
mod status;

pub use envelope::{ErrorEnvelope, HasStatus, ResponseData, ResponseEnvelope};
pub use raw::RawResponse;
pub use status::StatusCode;
