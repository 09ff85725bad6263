//! Startup configuration.

mod env;

pub use env::{ConfigError, EnvConfigLoader, ENV_API_BASE_URL, ENV_API_KEY, ENV_TIMEOUT};
