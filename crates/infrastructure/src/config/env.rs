//! Environment-backed configuration loading.
//!
//! The environment is read once, here; the resulting [`ClientConfig`] is
//! passed to the client explicitly.

use std::time::Duration;

use apiprobe_domain::{ClientConfig, DEFAULT_TIMEOUT, DomainError};
use thiserror::Error;
use tracing::warn;

/// Base URL of the API under test. Required.
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
/// Bearer token. Optional; blank values are ignored.
pub const ENV_API_KEY: &str = "API_KEY";
/// Request timeout in milliseconds. Optional.
pub const ENV_TIMEOUT: &str = "TIMEOUT";

/// Configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but unusable.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Builds a [`ClientConfig`] from environment variables.
///
/// The lookup function is injectable so tests never touch the process
/// environment.
pub struct EnvConfigLoader<L> {
    lookup: L,
}

impl EnvConfigLoader<fn(&str) -> Option<String>> {
    /// Reads from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            lookup: |key| std::env::var(key).ok(),
        }
    }
}

impl<L: Fn(&str) -> Option<String>> EnvConfigLoader<L> {
    /// Reads through a custom lookup.
    pub const fn with_lookup(lookup: L) -> Self {
        Self { lookup }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Assembles the configuration.
    ///
    /// `TIMEOUT` falls back to 5000 ms when missing, zero or not a number.
    ///
    /// # Errors
    ///
    /// Returns `Missing` without a base URL and `Invalid` when the base URL
    /// does not parse.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .get(ENV_API_BASE_URL)
            .ok_or(ConfigError::Missing(ENV_API_BASE_URL))?;

        let timeout = match self.get(ENV_TIMEOUT) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    warn!(value = %raw, "ignoring unusable {ENV_TIMEOUT}");
                    DEFAULT_TIMEOUT
                }
            },
        };

        let mut config = ClientConfig::new(base_url.trim())?.with_timeout(timeout);
        if let Some(api_key) = self.get(ENV_API_KEY) {
            config = config.with_api_key(api_key);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn loader(vars: &[(&str, &str)]) -> EnvConfigLoader<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvConfigLoader::with_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_full_configuration() {
        let config = loader(&[
            (ENV_API_BASE_URL, "https://pokeapi.co"),
            (ENV_API_KEY, "abc123"),
            (ENV_TIMEOUT, "1500"),
        ])
        .load()
        .expect("valid configuration");

        assert_eq!(config.base_url.as_str(), "https://pokeapi.co/");
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_defaults_and_blank_key() {
        let config = loader(&[(ENV_API_BASE_URL, "http://localhost:3000"), (ENV_API_KEY, "  ")])
            .load()
            .expect("valid configuration");

        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = loader(&[(ENV_API_BASE_URL, "http://localhost"), (ENV_TIMEOUT, "soon")])
            .load()
            .expect("valid configuration");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = loader(&[(ENV_API_BASE_URL, "http://localhost"), (ENV_TIMEOUT, "0")])
            .load()
            .expect("valid configuration");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_missing_base_url() {
        let err = loader(&[]).load().expect_err("base URL is required");
        assert!(matches!(err, ConfigError::Missing(ENV_API_BASE_URL)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = loader(&[(ENV_API_BASE_URL, "not a url")])
            .load()
            .expect_err("must be a URL");
        assert!(matches!(err, ConfigError::Invalid(DomainError::InvalidUrl(_))));
    }
}
