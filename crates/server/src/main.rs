mod bootstrap;
mod compare;
mod health;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pricecompare_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use pricecompare_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Now bootstrap using the same config we already loaded
    let app = bootstrap::bootstrap_with_config(config)?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.runner.clone(),
    )
    .await?;

    let runner = Arc::new(app.runner);
    let state = compare::CompareState::new(
        runner.clone(),
        runner,
        app.cookie_store,
        app.config.search.clone(),
    );

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "pricecompare-server started"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = {
        let serve = axum::serve(listener, compare::router(state)).with_graceful_shutdown(
            async move {
                let _ = shutdown_rx.await;
            },
        );
        tokio::spawn(async move { serve.await })
    };

    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "pricecompare-server stopping"
    );
    let _ = shutdown_tx.send(());

    // Give in-flight comparisons a bounded window to finish; agent runs can
    // take minutes and must not hold the process open forever.
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = app.config.server.graceful_shutdown_secs,
                "open connections did not drain before the shutdown deadline"
            );
        }
    }

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
