use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use pricecompare_agent::RunnerClient;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    runner: RunnerClient,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub runner: HealthCheck,
    pub checked_at: String,
}

pub fn router(runner: RunnerClient) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { runner })
}

pub async fn spawn(bind_address: &str, port: u16, runner: RunnerClient) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(runner)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let runner = runner_check(&state.runner).await;
    let ready = runner.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "pricecompare-server runtime initialized".to_string(),
        },
        runner,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn runner_check(runner: &RunnerClient) -> HealthCheck {
    match runner.health().await {
        Ok(()) => {
            HealthCheck { status: "ready", detail: "browsing runner reachable".to_string() }
        }
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("browsing runner unreachable: {error:#}"),
        },
    }
}
