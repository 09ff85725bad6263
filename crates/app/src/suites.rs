//! Bundled test suites.

use std::path::PathBuf;

use apiprobe_domain::request::RequestSpec;
use apiprobe_domain::{DEFAULT_MAX_RESPONSE_MS, Expectation, TestCase, TestSuite};
use serde_json::json;

use crate::fixtures::PokemonData;

/// Registry path of the Pokemon schema (`schemas/pokemon.schema.json`).
pub const POKEMON_SCHEMA: &str = "pokemon.schema";

/// Environment variable overriding the schema directory.
pub const ENV_SCHEMA_DIR: &str = "SCHEMA_DIR";

/// Resolves the schema directory.
///
/// A non-blank override wins; otherwise the schemas shipped with this crate
/// are used, independent of the working directory.
#[must_use]
pub fn schema_dir(override_dir: Option<String>) -> PathBuf {
    override_dir
        .filter(|dir| !dir.trim().is_empty())
        .map_or_else(
            || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas"),
            PathBuf::from,
        )
}

/// Checks the Pokemon lookup endpoint: a known id resolves with the right
/// data, an unknown one answers 404.
#[must_use]
pub fn pokemon_suite() -> TestSuite {
    let valid = PokemonData::valid();
    let invalid = PokemonData::invalid();

    TestSuite::new("Pokemon API")
        .with_case(
            TestCase::new("get pokemon data", RequestSpec::get(valid.endpoint()))
                .expect(Expectation::StatusCode { expected: 200 })
                .expect(Expectation::ResponseTime {
                    max_ms: DEFAULT_MAX_RESPONSE_MS,
                })
                .expect(Expectation::JsonPath {
                    path: "$.id".to_string(),
                    expected: None,
                })
                .expect(Expectation::JsonPath {
                    path: "$.name".to_string(),
                    expected: Some(json!(valid.name)),
                })
                .expect(Expectation::MatchesSchema {
                    schema: POKEMON_SCHEMA.to_string(),
                }),
        )
        .with_case(
            TestCase::new("unknown pokemon is 404", RequestSpec::get(invalid.endpoint()))
                .expect(Expectation::StatusCode { expected: 404 }),
        )
}
