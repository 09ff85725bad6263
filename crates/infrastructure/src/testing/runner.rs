//! Suite runner implementation.
//!
//! Executes each case's request and evaluates its expectations, producing
//! `SuiteResults`.

use std::sync::Arc;
use std::time::Instant;

use apiprobe_application::ports::{Clock, HttpClient, SchemaValidator};
use apiprobe_application::{ApiClient, ApiError, AssertionResult, Assertions};
use apiprobe_domain::response::{ErrorEnvelope, HasStatus, ResponseEnvelope};
use apiprobe_domain::{CaseResult, Expectation, ExpectationResult, SuiteResults, TestCase, TestSuite};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::json_path::query_json_path;
use crate::schema::SchemaRegistry;

/// What a case's request produced: a success envelope, or an error envelope
/// that can still be checked.
enum Outcome {
    Success(ResponseEnvelope),
    Failure(ErrorEnvelope),
}

impl Outcome {
    fn data(&self) -> Value {
        match self {
            Self::Success(response) => response.data.to_value(),
            Self::Failure(error) => error.data.as_ref().map_or(Value::Null, |d| d.to_value()),
        }
    }
}

impl HasStatus for Outcome {
    fn status(&self) -> u16 {
        match self {
            Self::Success(response) => response.status,
            Self::Failure(error) => error.status,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Runs test suites against a live API.
pub struct SuiteRunner<C: HttpClient, K: Clock, V: SchemaValidator> {
    client: ApiClient<C>,
    assertions: Assertions<K, V>,
    clock: Arc<K>,
    schemas: SchemaRegistry,
}

impl<C: HttpClient, K: Clock, V: SchemaValidator> SuiteRunner<C, K, V> {
    /// Creates a runner. `schemas` backs `MatchesSchema` expectations.
    pub fn new(
        client: ApiClient<C>,
        clock: Arc<K>,
        validator: Arc<V>,
        schemas: SchemaRegistry,
    ) -> Self {
        Self {
            client,
            assertions: Assertions::new(Arc::clone(&clock), validator),
            clock,
            schemas,
        }
    }

    /// Runs every case in order.
    ///
    /// Stops after the first failing case when the suite asks for it.
    pub async fn run(&self, suite: &TestSuite) -> SuiteResults {
        let start = Instant::now();
        let mut cases = Vec::with_capacity(suite.len());

        for case in &suite.cases {
            let result = self.run_case(case).await;
            let failed = !result.passed();
            if failed {
                warn!(case = %result.name, failures = ?result.failures(), "case failed");
            } else {
                info!(case = %result.name, duration_ms = result.duration_ms, "case passed");
            }
            cases.push(result);

            if failed && suite.stop_on_failure {
                break;
            }
        }

        let results = SuiteResults::new(&suite.name, cases, elapsed_ms(start));
        info!(
            suite = %results.suite_name,
            total = results.total,
            passed = results.passed,
            failed = results.failed,
            "suite finished"
        );
        results
    }

    /// Runs one case.
    ///
    /// A non-2xx answer is still evaluated through its error envelope;
    /// timeouts and transport failures fail the case outright.
    pub async fn run_case(&self, case: &TestCase) -> CaseResult {
        let started_at = self.clock.now();
        let start = Instant::now();

        let outcome = match self.client.request(&case.request).await {
            Ok(response) => Outcome::Success(response),
            Err(ApiError::Status(error)) => Outcome::Failure(error),
            Err(e) => {
                return CaseResult {
                    name: case.name.clone(),
                    expectations: Vec::new(),
                    error: Some(e.to_string()),
                    duration_ms: elapsed_ms(start),
                };
            }
        };

        let data = outcome.data();
        let expectations = case
            .expectations
            .iter()
            .map(|expectation| {
                match self.evaluate(expectation, &outcome, &data, started_at) {
                    Ok(()) => ExpectationResult::pass(expectation.clone()),
                    Err(message) => ExpectationResult::fail(expectation.clone(), message),
                }
            })
            .collect();

        CaseResult {
            name: case.name.clone(),
            expectations,
            error: None,
            duration_ms: elapsed_ms(start),
        }
    }

    fn evaluate(
        &self,
        expectation: &Expectation,
        outcome: &Outcome,
        data: &Value,
        started_at: DateTime<Utc>,
    ) -> Result<(), String> {
        let checked = |result: AssertionResult| result.map_err(|e| e.to_string());

        match expectation {
            Expectation::StatusCode { expected } => {
                checked(self.assertions.validate_status_code(outcome, *expected))
            }
            Expectation::ResponseTime { max_ms } => checked(
                self.assertions
                    .validate_response_time_within(started_at, *max_ms),
            ),
            Expectation::MatchesSchema { schema } => {
                let schema = self.schemas.get_by_path(schema).map_err(|e| e.to_string())?;
                checked(self.assertions.validate_payload_schema(data, schema))
            }
            Expectation::JsonPath { path, expected } => {
                let value = resolve(data, path)?;
                match expected {
                    Some(expected) if value != expected => Err(format!(
                        "JSON path '{path}' value mismatch: expected {expected}, got {value}"
                    )),
                    _ => Ok(()),
                }
            }
            Expectation::NotEmpty { path } => {
                checked(self.assertions.validate_not_empty(resolve(data, path)?))
            }
            Expectation::Contains { path, value } => {
                checked(self.assertions.validate_contains(resolve(data, path)?, value))
            }
            Expectation::ArrayLength { path, length } => {
                checked(self.assertions.validate_array_length(resolve(data, path)?, *length))
            }
        }
    }
}

fn resolve<'a>(data: &'a Value, path: &str) -> Result<&'a Value, String> {
    query_json_path(data, path)
        .map_err(|e| format!("Invalid JSON path '{path}': {e}"))?
        .ok_or_else(|| format!("JSON path '{path}' not found"))
}
