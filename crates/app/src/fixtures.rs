//! Test data fixtures.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Identifying fields of a Pokemon resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonData {
    /// Resource id.
    pub id: u32,
    /// Lowercase species name.
    pub name: String,
    /// Sort order in the national dex.
    pub order: u32,
}

impl PokemonData {
    /// A Pokemon the public API knows.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            id: 88,
            name: "grimer".to_string(),
            order: 141,
        }
    }

    /// An id no Pokemon has; lookups answer 404.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            id: 8888,
            name: "grimor".to_string(),
            order: 0,
        }
    }

    /// Endpoint for this Pokemon.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("/api/v2/pokemon/{}", self.id)
    }
}

/// Random lowercase alphanumeric string of `len` characters.
#[must_use]
pub fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Random address under `example.com`.
#[must_use]
pub fn random_email() -> String {
    format!("test{}@example.com", random_string(10))
}
