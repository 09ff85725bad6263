//! HTTP Request domain types

mod body;
mod header;
mod method;
mod prepared;
mod query;
mod spec;

pub use body::RequestBody;
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use prepared::PreparedRequest;
pub use query::{QueryParam, QueryParams, QueryValue};
pub use spec::RequestSpec;
