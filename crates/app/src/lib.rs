//! Apiprobe - test data and suites for the runner binary.
//!
//! The library half of the `apiprobe` crate holds the fixtures and the
//! bundled suites so integration tests can drive them against a mock API.

pub mod fixtures;
pub mod suites;

pub use fixtures::{PokemonData, random_email, random_string};
pub use suites::{ENV_SCHEMA_DIR, POKEMON_SCHEMA, pokemon_suite, schema_dir};
