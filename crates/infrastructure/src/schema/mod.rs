//! JSON Schema loading and validation.

mod loader;
mod validator;

pub use loader::{SchemaLoadError, SchemaLoader, SchemaRegistry};
pub use validator::JsonSchemaValidator;
