//! Assertion layer
//!
//! Reusable checks over the outcome of an API call. Every check returns
//! `Ok(())` or an [`AssertionError`] naming what was expected and what was
//! found; nothing is retried.

use std::fmt::Write as _;
use std::sync::Arc;

use apiprobe_domain::response::{HasStatus, ResponseEnvelope};
use apiprobe_domain::{DEFAULT_MAX_RESPONSE_MS, SchemaViolation};
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::ports::{Clock, SchemaCompileError, SchemaValidator};

/// Draft marker inserted into schemas that do not declare one.
pub const DEFAULT_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-06/schema#";

/// A failed check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssertionError {
    /// Status code differs from the expected one.
    #[error("Expected status {expected} but got {actual}")]
    StatusMismatch {
        /// Expected status.
        expected: u16,
        /// Received status.
        actual: u16,
    },

    /// The call took at least as long as the allowed maximum.
    #[error("Response time {elapsed_ms}ms exceeded maximum of {max_ms}ms")]
    TooSlow {
        /// Measured time.
        elapsed_ms: i64,
        /// Allowed maximum.
        max_ms: u64,
    },

    /// The data did not conform to the schema.
    #[error("{}", format_violations(.violations))]
    Schema {
        /// Every violation the validator reported.
        violations: Vec<SchemaViolation>,
    },

    /// The schema document could not be compiled.
    #[error(transparent)]
    InvalidSchema(#[from] SchemaCompileError),

    /// A container had no elements.
    #[error("Expected non-empty {kind} but it was empty")]
    Empty {
        /// `array`, `object` or `string`.
        kind: &'static str,
    },

    /// A value that is not an array, object or string was checked as a container.
    #[error("Expected an array, object or string but got {actual}")]
    NotAContainer {
        /// JSON rendering of the value.
        actual: String,
    },

    /// The expected member is missing from the container.
    #[error("Expected {container} to contain {expected}")]
    NotContained {
        /// JSON rendering of the container.
        container: String,
        /// JSON rendering of the expected member.
        expected: String,
    },

    /// Element count differs.
    #[error("Expected array length {expected} but got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A length check was applied to something that has no length.
    #[error("Expected an array but got {actual}")]
    NotAnArray {
        /// JSON rendering of the value.
        actual: String,
    },
}

fn format_violations(violations: &[SchemaViolation]) -> String {
    let mut message = String::from("Schema validation failed:");
    for violation in violations {
        let _ = write!(message, "\n{violation}");
    }
    message
}

/// Result type alias for assertions.
pub type AssertionResult = Result<(), AssertionError>;

/// Returns `schema` with a draft marker added when it has none.
///
/// The caller's value is never touched.
#[must_use]
pub fn with_default_draft(schema: &Value) -> Value {
    let mut schema = schema.clone();
    if let Value::Object(map) = &mut schema
        && !map.contains_key("$schema")
    {
        map.insert(
            "$schema".to_string(),
            Value::String(DEFAULT_SCHEMA_DRAFT.to_string()),
        );
    }
    schema
}

/// The assertion helpers, bound to a clock and a schema validator.
pub struct Assertions<K: Clock, V: SchemaValidator> {
    clock: Arc<K>,
    validator: Arc<V>,
}

impl<K: Clock, V: SchemaValidator> Clone for Assertions<K, V> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<K: Clock, V: SchemaValidator> Assertions<K, V> {
    /// Creates the assertion helpers.
    pub const fn new(clock: Arc<K>, validator: Arc<V>) -> Self {
        Self { clock, validator }
    }

    /// Checks the status of a response or error envelope.
    ///
    /// # Errors
    ///
    /// Returns `StatusMismatch` unless the status equals `expected`.
    pub fn validate_status_code(&self, response: &impl HasStatus, expected: u16) -> AssertionResult {
        let actual = response.status();
        if actual == expected {
            Ok(())
        } else {
            Err(AssertionError::StatusMismatch { expected, actual })
        }
    }

    /// Checks that less than the default 2000 ms passed since `start`.
    ///
    /// # Errors
    ///
    /// Returns `TooSlow` if the elapsed time reached the bound.
    pub fn validate_response_time(&self, start: DateTime<Utc>) -> AssertionResult {
        self.validate_response_time_within(start, DEFAULT_MAX_RESPONSE_MS)
    }

    /// Checks that less than `max_ms` passed since `start`.
    ///
    /// # Errors
    ///
    /// Returns `TooSlow` if the elapsed time reached the bound.
    pub fn validate_response_time_within(
        &self,
        start: DateTime<Utc>,
        max_ms: u64,
    ) -> AssertionResult {
        let elapsed_ms = (self.clock.now() - start).num_milliseconds();
        if elapsed_ms < i64::try_from(max_ms).unwrap_or(i64::MAX) {
            Ok(())
        } else {
            Err(AssertionError::TooSlow { elapsed_ms, max_ms })
        }
    }

    /// Validates a response envelope's data against a schema.
    ///
    /// Text bodies are validated as JSON strings.
    ///
    /// # Errors
    ///
    /// Returns `Schema` with every violation, or `InvalidSchema` if the
    /// schema does not compile.
    pub fn validate_schema(&self, response: &ResponseEnvelope, schema: &Value) -> AssertionResult {
        self.validate_payload_schema(&response.data.to_value(), schema)
    }

    /// Validates a raw JSON value against a schema.
    ///
    /// # Errors
    ///
    /// Returns `Schema` with every violation, or `InvalidSchema` if the
    /// schema does not compile.
    pub fn validate_payload_schema(&self, payload: &Value, schema: &Value) -> AssertionResult {
        let schema = with_default_draft(schema);
        let violations = self.validator.violations(&schema, payload)?;
        if violations.is_empty() {
            debug!("schema validation passed");
            return Ok(());
        }

        error!(data = %payload, "Schema validation failed");
        Err(AssertionError::Schema { violations })
    }

    /// Checks that an array, object or string has at least one element.
    ///
    /// # Errors
    ///
    /// Returns `Empty` for empty containers and `NotAContainer` for scalars.
    pub fn validate_not_empty(&self, data: &Value) -> AssertionResult {
        let (kind, empty) = match data {
            Value::Array(items) => ("array", items.is_empty()),
            Value::Object(map) => ("object", map.is_empty()),
            Value::String(text) => ("string", text.is_empty()),
            other => {
                return Err(AssertionError::NotAContainer {
                    actual: other.to_string(),
                });
            }
        };
        if empty {
            Err(AssertionError::Empty { kind })
        } else {
            Ok(())
        }
    }

    /// Checks membership.
    ///
    /// Arrays must hold an element equal to `value`; strings must contain
    /// `value` as a substring; objects must carry every property of `value`
    /// with an equal value.
    ///
    /// # Errors
    ///
    /// Returns `NotContained` when the member is missing and
    /// `NotAContainer` when `container` cannot hold members.
    pub fn validate_contains(&self, container: &Value, value: &Value) -> AssertionResult {
        let found = match (container, value) {
            (Value::Array(items), _) => items.contains(value),
            (Value::String(text), Value::String(needle)) => text.contains(needle.as_str()),
            (Value::String(_), _) => false,
            (Value::Object(map), Value::Object(subset)) => subset
                .iter()
                .all(|(key, expected)| map.get(key) == Some(expected)),
            (Value::Object(map), Value::String(key)) => map.contains_key(key),
            (Value::Object(_), _) => false,
            (other, _) => {
                return Err(AssertionError::NotAContainer {
                    actual: other.to_string(),
                });
            }
        };

        if found {
            Ok(())
        } else {
            Err(AssertionError::NotContained {
                container: container.to_string(),
                expected: value.to_string(),
            })
        }
    }

    /// Checks the exact element count of an array (char count for strings).
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` on a different count and `NotAnArray` for
    /// values without a length.
    pub fn validate_array_length(&self, array: &Value, length: usize) -> AssertionResult {
        let actual = match array {
            Value::Array(items) => items.len(),
            Value::String(text) => text.chars().count(),
            other => {
                return Err(AssertionError::NotAnArray {
                    actual: other.to_string(),
                });
            }
        };
        if actual == length {
            Ok(())
        } else {
            Err(AssertionError::LengthMismatch {
                expected: length,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiprobe_domain::response::{ErrorEnvelope, ResponseData};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Requires `id` to be an integer and `name` a string; records the
    /// schema it was handed.
    #[derive(Default)]
    struct FakeValidator {
        seen_schema: Mutex<Option<Value>>,
    }

    impl SchemaValidator for FakeValidator {
        fn violations(
            &self,
            schema: &Value,
            instance: &Value,
        ) -> Result<Vec<SchemaViolation>, SchemaCompileError> {
            *self.seen_schema.lock().expect("lock") = Some(schema.clone());
            if schema.get("type") == Some(&json!(42)) {
                return Err(SchemaCompileError("type must be a string".to_string()));
            }

            let mut violations = Vec::new();
            if !instance.is_object() {
                violations.push(SchemaViolation::new("", "is not of type \"object\""));
                return Ok(violations);
            }
            match instance.get("id") {
                Some(v) if v.is_i64() || v.is_u64() => {}
                Some(v) => violations.push(SchemaViolation::new("/id", format!("{v} is not of type \"integer\""))),
                None => violations.push(SchemaViolation::new("", "\"id\" is a required property")),
            }
            match instance.get("name") {
                Some(v) if v.is_string() => {}
                Some(v) => violations.push(SchemaViolation::new("/name", format!("{v} is not of type \"string\""))),
                None => violations.push(SchemaViolation::new("", "\"name\" is a required property")),
            }
            Ok(violations)
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn assertions_at(now: DateTime<Utc>) -> (Assertions<FixedClock, FakeValidator>, Arc<FakeValidator>) {
        let validator = Arc::new(FakeValidator::default());
        (
            Assertions::new(Arc::new(FixedClock(now)), Arc::clone(&validator)),
            validator,
        )
    }

    fn assertions() -> Assertions<FixedClock, FakeValidator> {
        assertions_at(start()).0
    }

    fn pokemon_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string"}
            }
        })
    }

    #[test]
    fn test_status_code_matches() {
        let response = ResponseEnvelope::new(200, "OK", ResponseData::Json(json!({})), "http://x");
        assert_eq!(assertions().validate_status_code(&response, 200), Ok(()));
    }

    #[test]
    fn test_status_code_mismatch_names_both() {
        let error = ErrorEnvelope::new(404, "Not Found", ResponseData::Text("nope".to_string()));

        let err = assertions()
            .validate_status_code(&error, 200)
            .expect_err("404 is not 200");

        assert_eq!(
            err,
            AssertionError::StatusMismatch {
                expected: 200,
                actual: 404
            }
        );
        assert_eq!(err.to_string(), "Expected status 200 but got 404");
    }

    #[test]
    fn test_response_time_bounds() {
        let (fast, _) = assertions_at(start() + Duration::milliseconds(1999));
        assert_eq!(fast.validate_response_time(start()), Ok(()));

        let (slow, _) = assertions_at(start() + Duration::milliseconds(2000));
        assert_eq!(
            slow.validate_response_time(start()),
            Err(AssertionError::TooSlow {
                elapsed_ms: 2000,
                max_ms: 2000
            })
        );

        assert_eq!(slow.validate_response_time_within(start(), 2500), Ok(()));
    }

    #[test]
    fn test_schema_accepts_conforming_data() {
        let response = ResponseEnvelope::new(
            200,
            "OK",
            ResponseData::Json(json!({"id": 88, "name": "grimer", "order": 141})),
            "http://x",
        );
        assert_eq!(
            assertions().validate_schema(&response, &pokemon_schema()),
            Ok(())
        );
    }

    #[test]
    #[traced_test]
    fn test_schema_reports_every_violation() {
        let err = assertions()
            .validate_payload_schema(&json!({"id": "x"}), &pokemon_schema())
            .expect_err("must fail");

        let AssertionError::Schema { violations } = &err else {
            panic!("expected schema error, got {err:?}");
        };
        assert_eq!(violations.len(), 2);
        assert_eq!(
            err.to_string(),
            "Schema validation failed:\n/id \"x\" is not of type \"integer\"\nroot \"name\" is a required property"
        );
        assert!(logs_contain("Schema validation failed"));
    }

    #[test]
    fn test_default_draft_added_to_copy_only() {
        let (assertions, validator) = assertions_at(start());
        let schema = pokemon_schema();

        assertions
            .validate_payload_schema(&json!({"id": 1, "name": "a"}), &schema)
            .expect("conforms");

        assert!(schema.get("$schema").is_none());
        let seen = validator.seen_schema.lock().expect("lock").clone().expect("schema seen");
        assert_eq!(seen.get("$schema"), Some(&json!(DEFAULT_SCHEMA_DRAFT)));
    }

    #[test]
    fn test_declared_draft_kept() {
        let schema = json!({"$schema": "https://json-schema.org/draft/2020-12/schema"});
        assert_eq!(with_default_draft(&schema), schema);
    }

    #[test]
    fn test_invalid_schema_is_distinct_error() {
        let err = assertions()
            .validate_payload_schema(&json!({}), &json!({"type": 42}))
            .expect_err("must fail");
        assert!(matches!(err, AssertionError::InvalidSchema(_)));
    }

    #[test]
    fn test_not_empty() {
        let a = assertions();
        assert_eq!(a.validate_not_empty(&json!([1])), Ok(()));
        assert_eq!(a.validate_not_empty(&json!({"k": 1})), Ok(()));
        assert_eq!(a.validate_not_empty(&json!("x")), Ok(()));
        assert_eq!(
            a.validate_not_empty(&json!([])),
            Err(AssertionError::Empty { kind: "array" })
        );
        assert_eq!(
            a.validate_not_empty(&json!({})),
            Err(AssertionError::Empty { kind: "object" })
        );
        assert!(matches!(
            a.validate_not_empty(&json!(5)),
            Err(AssertionError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let a = assertions();
        assert_eq!(a.validate_contains(&json!(["a", "b"]), &json!("b")), Ok(()));
        assert_eq!(a.validate_contains(&json!("grimer"), &json!("rim")), Ok(()));
        assert_eq!(
            a.validate_contains(&json!({"id": 88, "name": "grimer"}), &json!({"name": "grimer"})),
            Ok(())
        );
        assert_eq!(
            a.validate_contains(&json!({"id": 88}), &json!("id")),
            Ok(())
        );

        let err = a
            .validate_contains(&json!([1, 2]), &json!(3))
            .expect_err("3 is missing");
        assert_eq!(err.to_string(), "Expected [1,2] to contain 3");

        assert!(matches!(
            a.validate_contains(&json!(null), &json!(1)),
            Err(AssertionError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_array_length() {
        let a = assertions();
        assert_eq!(a.validate_array_length(&json!([1, 2, 3]), 3), Ok(()));
        assert_eq!(a.validate_array_length(&json!("héllo"), 5), Ok(()));
        assert_eq!(
            a.validate_array_length(&json!([1]), 2),
            Err(AssertionError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            a.validate_array_length(&json!({"a": 1}), 1),
            Err(AssertionError::NotAnArray { .. })
        ));
    }
}
