//! Schema validation port

use apiprobe_domain::SchemaViolation;
use serde_json::Value;
use thiserror::Error;

/// The schema document itself could not be compiled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid schema: {0}")]
pub struct SchemaCompileError(pub String);

/// Port for JSON Schema validation.
///
/// Compilation is a pure function of the schema document. Implementations
/// may cache compiled validators by schema identity, but a fresh compile
/// must give the same answer.
pub trait SchemaValidator: Send + Sync {
    /// Validates `instance` against `schema` and returns every violation;
    /// an empty list means the instance conforms.
    ///
    /// # Errors
    ///
    /// Returns an error if `schema` is not a valid schema document.
    fn violations(
        &self,
        schema: &Value,
        instance: &Value,
    ) -> Result<Vec<SchemaViolation>, SchemaCompileError>;
}
