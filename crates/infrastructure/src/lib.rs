//! Apiprobe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus schema loading, environment
//! configuration and the declarative suite runner.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod schema;
pub mod serialization;
pub mod testing;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, EnvConfigLoader};
pub use persistence::TokioFileSystem;
pub use schema::{JsonSchemaValidator, SchemaLoadError, SchemaLoader, SchemaRegistry};
pub use serialization::{SerializationError, from_json, from_json_bytes, to_json_pretty};
pub use testing::{JsonPathError, SuiteRunner, query_json_path};
