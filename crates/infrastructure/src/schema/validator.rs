//! `SchemaValidator` adapter backed by the `jsonschema` crate.

use std::collections::HashMap;
use std::sync::Arc;

use apiprobe_application::ports::{SchemaCompileError, SchemaValidator};
use apiprobe_domain::SchemaViolation;
use jsonschema::Validator;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

/// Compiles schemas with format checking enabled and reports every
/// violation.
///
/// The draft is taken from the schema's `$schema` keyword. Compiled
/// validators are cached by the schema's serialized form when caching is
/// enabled; results are identical either way.
#[derive(Default)]
pub struct JsonSchemaValidator {
    cache: Option<Mutex<HashMap<String, Arc<Validator>>>>,
}

impl JsonSchemaValidator {
    /// Creates a validator that compiles on every call.
    #[must_use]
    pub const fn new() -> Self {
        Self { cache: None }
    }

    /// Creates a validator that reuses compiled schemas.
    #[must_use]
    pub fn cached() -> Self {
        Self {
            cache: Some(Mutex::new(HashMap::new())),
        }
    }

    fn compile(schema: &Value) -> Result<Validator, SchemaCompileError> {
        jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaCompileError(e.to_string()))
    }

    fn validator_for(&self, schema: &Value) -> Result<Arc<Validator>, SchemaCompileError> {
        let Some(cache) = &self.cache else {
            return Self::compile(schema).map(Arc::new);
        };

        let key = schema.to_string();
        if let Some(hit) = cache.lock().get(&key) {
            trace!("compiled schema cache hit");
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(Self::compile(schema)?);
        cache.lock().insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of compiled schemas held in the cache.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.lock().len())
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn violations(
        &self,
        schema: &Value,
        instance: &Value,
    ) -> Result<Vec<SchemaViolation>, SchemaCompileError> {
        let validator = self.validator_for(schema)?;
        Ok(validator
            .iter_errors(instance)
            .map(|e| SchemaViolation::new(e.instance_path.to_string(), e.to_string()))
            .collect())
    }
}
