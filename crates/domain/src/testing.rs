//! Declarative API test cases and their results.
//!
//! A `TestSuite` groups `TestCase`s; each case pairs one request with the
//! expectations its outcome must meet.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::RequestSpec;

/// Response-time bound used when a case does not specify one.
pub const DEFAULT_MAX_RESPONSE_MS: u64 = 2000;

/// A check to run against the outcome of a test case.
///
/// Path-addressed variants use `$`-rooted paths (`$.results[0].name`) into
/// the response data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Status code must equal `expected`.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// The call must complete in under `max_ms`.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        #[serde(default = "default_max_ms")]
        max_ms: u64,
    },
    /// Response data must conform to a loaded schema.
    MatchesSchema {
        /// Dotted lookup path into the loaded schemas, e.g. `pokemon.schema`.
        schema: String,
    },
    /// Value at `path` must exist and optionally equal `expected`.
    JsonPath {
        /// Path expression (e.g., "$.name").
        path: String,
        /// Expected value (as JSON).
        #[serde(default)]
        expected: Option<serde_json::Value>,
    },
    /// Container at `path` must have at least one element.
    NotEmpty {
        /// Path expression.
        path: String,
    },
    /// Container at `path` must include `value`.
    Contains {
        /// Path expression.
        path: String,
        /// Member, substring, or property subset to look for.
        value: serde_json::Value,
    },
    /// Array at `path` must have exactly `length` elements.
    ArrayLength {
        /// Path expression.
        path: String,
        /// Expected element count.
        length: usize,
    },
}

const fn default_max_ms() -> u64 {
    DEFAULT_MAX_RESPONSE_MS
}

impl Expectation {
    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code = {expected}"),
            Self::ResponseTime { max_ms } => format!("Response time < {max_ms}ms"),
            Self::MatchesSchema { schema } => format!("Data matches schema '{schema}'"),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::NotEmpty { path } => format!("JSON {path} is not empty"),
            Self::Contains { path, value } => format!("JSON {path} contains {value}"),
            Self::ArrayLength { path, length } => format!("JSON {path} has length {length}"),
        }
    }
}

/// One failed constraint reported by a schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value; empty for the document root.
    pub path: String,
    /// Validator message.
    pub message: String,
}

impl SchemaViolation {
    /// Creates a violation record.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "root" } else { &self.path };
        write!(f, "{path} {}", self.message)
    }
}

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// The expectation that was evaluated.
    pub expectation: Expectation,
    /// Whether it held.
    pub passed: bool,
    /// Failure message.
    pub error: Option<String>,
}

impl ExpectationResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(expectation: Expectation) -> Self {
        Self {
            expectation,
            passed: true,
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(expectation: Expectation, error: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: false,
            error: Some(error.into()),
        }
    }
}

/// A single request plus the expectations on its outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    /// Case name, shown in reports.
    pub name: String,
    /// The request to issue.
    pub request: RequestSpec,
    /// Checks to run on the outcome.
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

impl TestCase {
    /// Creates a case with no expectations.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
            expectations: Vec::new(),
        }
    }

    /// Add an expectation (builder pattern).
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// A named group of test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: Uuid,
    /// Test suite name.
    pub name: String,
    /// Cases, run in order.
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// Whether to stop at the first failing case.
    #[serde(default)]
    pub stop_on_failure: bool,
}

fn generate_id() -> Uuid {
    Uuid::now_v7()
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            cases: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add a case (builder pattern).
    #[must_use]
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Get the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }
}

/// Outcome of one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Per-expectation results; empty when the request itself failed.
    pub expectations: Vec<ExpectationResult>,
    /// Request failure that prevented evaluation, if any.
    pub error: Option<String>,
    /// Wall time of the case in milliseconds.
    pub duration_ms: u64,
}

impl CaseResult {
    /// Whether the request succeeded and every expectation held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.expectations.iter().all(|e| e.passed)
    }

    /// Failure messages, request error first.
    #[must_use]
    pub fn failures(&self) -> Vec<&str> {
        self.error
            .iter()
            .map(String::as_str)
            .chain(self.expectations.iter().filter_map(|e| e.error.as_deref()))
            .collect()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual case results.
    pub cases: Vec<CaseResult>,
    /// Number of cases run.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteResults {
    /// Create new suite results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, cases: Vec<CaseResult>, duration_ms: u64) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed()).count();
        let failed = total - passed;

        Self {
            suite_name: suite_name.into(),
            cases,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
