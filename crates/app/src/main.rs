//! Apiprobe - Main Entry Point
//!
//! Loads configuration from the environment (and `.env`), loads the schema
//! directory, runs the bundled suite against the configured API and exits
//! non-zero when any case fails.

use std::process::ExitCode;
use std::sync::Arc;

use apiprobe::{ENV_SCHEMA_DIR, pokemon_suite, schema_dir};
use apiprobe_application::ApiClient;
use apiprobe_infrastructure::{
    EnvConfigLoader, JsonSchemaValidator, ReqwestHttpClient, SchemaLoader, SuiteRunner,
    SystemClock, TokioFileSystem, to_json_pretty,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EnvConfigLoader::from_process().load()?;
    info!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis(), "configuration loaded");

    let schema_dir = schema_dir(std::env::var(ENV_SCHEMA_DIR).ok());
    let schemas = SchemaLoader::new(Arc::new(TokioFileSystem::new()))
        .load_all(&schema_dir)
        .await?;

    let client = ApiClient::new(Arc::new(ReqwestHttpClient::new()?), config);
    let runner = SuiteRunner::new(
        client,
        Arc::new(SystemClock::new()),
        Arc::new(JsonSchemaValidator::cached()),
        schemas,
    );

    let results = runner.run(&pokemon_suite()).await;
    println!("{}", to_json_pretty(&results)?);

    if results.all_passed() {
        info!(pass_rate = results.pass_rate(), "all cases passed");
        Ok(ExitCode::SUCCESS)
    } else {
        error!(failed = results.failed, total = results.total, "suite failed");
        Ok(ExitCode::FAILURE)
    }
}
