//! Price comparison endpoint.
//!
//! `POST /compare` takes a product query plus the caller's current HUF price,
//! delegates a natural-language browsing task to the runner, and turns the
//! agent's extracted listing into a pricing suggestion. The browsing session
//! behind the runner is a single shared resource, so comparisons serialize on
//! a session gate for the duration of the agent run and cookie capture.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use pricecompare_agent::{
    build_task, parse_agent_result, search_url, BrowsingAgent, CookieStore, SessionCookies,
    SessionGate,
};
use pricecompare_core::config::SearchConfig;
use pricecompare_core::domain::{ComparisonRequest, ComparisonResult};
use pricecompare_core::errors::CompareError;
use pricecompare_core::{price, suggestion};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CompareState {
    agent: Arc<dyn BrowsingAgent>,
    session: Arc<dyn SessionCookies>,
    gate: SessionGate,
    cookie_store: CookieStore,
    search: SearchConfig,
}

impl CompareState {
    pub fn new(
        agent: Arc<dyn BrowsingAgent>,
        session: Arc<dyn SessionCookies>,
        cookie_store: CookieStore,
        search: SearchConfig,
    ) -> Self {
        Self { agent, session, gate: SessionGate::new(), cookie_store, search }
    }
}

#[derive(Debug, Serialize)]
pub struct CompareErrorBody {
    pub error: String,
    pub detail: Option<String>,
}

pub fn router(state: CompareState) -> Router {
    Router::new().route("/compare", post(compare)).with_state(state)
}

async fn compare(
    State(state): State<CompareState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ComparisonResult>, (StatusCode, Json<CompareErrorBody>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(payload) = payload.map_err(|rejection| {
        reject(&correlation_id, CompareError::bad_request(rejection.body_text()))
    })?;

    let (query, current_huf) =
        validate(&payload).map_err(|error| reject(&correlation_id, error))?;

    info!(
        event_name = "compare.request.received",
        correlation_id = %correlation_id,
        query = %query,
        current_price_huf = current_huf,
        "price comparison requested"
    );

    let result = run_comparison(&state, &correlation_id, &query, current_huf)
        .await
        .map_err(|error| reject(&correlation_id, error))?;

    info!(
        event_name = "compare.request.completed",
        correlation_id = %correlation_id,
        suggestion = %result.suggestion,
        "price comparison completed"
    );
    Ok(Json(result))
}

/// Full comparison pipeline behind the handler, separated so the flow is
/// testable without HTTP plumbing.
pub async fn run_comparison(
    state: &CompareState,
    correlation_id: &str,
    query: &str,
    current_huf: f64,
) -> Result<ComparisonResult, CompareError> {
    let task = build_task(query, &state.search);
    info!(
        event_name = "compare.task.dispatched",
        correlation_id = %correlation_id,
        search_url = %search_url(query, &state.search),
        "browsing task dispatched"
    );

    // The gate covers the agent run and the cookie read that follows it;
    // both touch the shared browsing session.
    let history = {
        let _session = state.gate.acquire().await;

        let history = state
            .agent
            .run_task(&task)
            .await
            .map_err(|error| CompareError::upstream_agent(format!("{error:#}")))?;
        info!(
            event_name = "compare.agent.completed",
            correlation_id = %correlation_id,
            steps = history.steps.len(),
            "browsing agent completed"
        );

        match state.session.read_cookies().await {
            Ok(cookies) => state.cookie_store.persist(&cookies, correlation_id).await,
            Err(error) => warn!(
                event_name = "session.cookies.read_failed",
                correlation_id = %correlation_id,
                error = %format!("{error:#}"),
                "could not read session cookies"
            ),
        }

        history
    };

    let item = parse_agent_result(&history).map_err(|parse_error| {
        error!(
            event_name = "compare.parse.failed",
            correlation_id = %correlation_id,
            raw = parse_error.raw_output().unwrap_or_default(),
            "agent output could not be parsed"
        );
        CompareError::upstream_parse(parse_error.to_string())
    })?;

    let lowest = price::normalize(&item.price_huf)?;
    let suggestion = suggestion::suggest(current_huf, lowest);
    info!(
        event_name = "compare.result.computed",
        correlation_id = %correlation_id,
        lowest_huf = lowest,
        diff_pct = suggestion::percent_difference(current_huf, lowest),
        "comparison result computed"
    );

    Ok(ComparisonResult { cheapest: item, suggestion })
}

/// Boundary validation. Presence is checked before shape so a request that is
/// wrong in both ways reports the missing fields first; present payloads are
/// then decoded through the wire schema.
fn validate(payload: &Value) -> Result<(String, f64), CompareError> {
    let query_present =
        payload.get("query").and_then(Value::as_str).is_some_and(|query| !query.trim().is_empty());
    let price_present = payload.get("currentPriceHUF").is_some_and(|value| !value.is_null());
    if !query_present || !price_present {
        return Err(CompareError::bad_request("query and currentPriceHUF are required"));
    }

    let request: ComparisonRequest = serde_json::from_value(payload.clone())
        .map_err(|_| CompareError::bad_request("currentPriceHUF must be a valid number"))?;
    let current_huf = request
        .current_price_huf
        .as_f64()
        .ok_or_else(|| CompareError::bad_request("currentPriceHUF must be a valid number"))?;

    Ok((request.query.trim().to_string(), current_huf))
}

fn reject(
    correlation_id: &str,
    error: CompareError,
) -> (StatusCode, Json<CompareErrorBody>) {
    error!(
        event_name = "compare.request.failed",
        correlation_id = %correlation_id,
        error_class = error.error_class(),
        detail = error.detail(),
        "price comparison failed"
    );
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(CompareErrorBody {
            error: error.error_class().to_string(),
            detail: Some(error.detail().to_string()),
        }),
    )
}
