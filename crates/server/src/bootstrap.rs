use pricecompare_agent::{CookieStore, RunnerClient};
use pricecompare_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runner: RunnerClient,
    pub cookie_store: CookieStore,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("browsing runner client could not be built: {0}")]
    RunnerClient(#[source] reqwest::Error),
}

/// Assemble the application from an already-loaded config. The runner is not
/// probed here; services may start in any order and the health endpoint
/// reports runner reachability.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let runner =
        RunnerClient::new(&config.agent, &config.llm).map_err(BootstrapError::RunnerClient)?;
    info!(
        event_name = "system.bootstrap.runner_client_ready",
        correlation_id = "bootstrap",
        runner_base_url = %runner.base_url(),
        "browsing runner client initialized"
    );

    let cookie_store = CookieStore::new(config.session.cookies_file.clone());
    info!(
        event_name = "system.bootstrap.cookie_store_ready",
        correlation_id = "bootstrap",
        cookies_file = %cookie_store.path().display(),
        "session cookie store initialized"
    );

    Ok(Application { config, runner, cookie_store })
}
