//! Request handlers for the counter API.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::dispatch::client::REQUEST_SOURCE_HEADER;
use crate::dispatch::runner::{run_synthetic_load, DispatchError};
use crate::http::validation::validate_api_path;
use crate::resilience::circuit_breaker::TripHook;
use crate::store::{CounterStore, NAMESPACE_REAL, NAMESPACE_TEST};

use super::server::AppState;

/// Pick the accounting namespace from the request-source header.
fn traffic_namespace(headers: &HeaderMap) -> &'static str {
    let source = headers
        .get(REQUEST_SOURCE_HEADER)
        .and_then(|value| value.to_str().ok());

    if source == Some(NAMESPACE_TEST) {
        NAMESPACE_TEST
    } else {
        NAMESPACE_REAL
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `GET /api/`: counts the bare API root.
pub async fn api_root(State(state): State<AppState>, headers: HeaderMap) -> Response {
    count_and_respond(&state.store, &headers, String::new())
}

/// `GET /api/{*path}`: validates, counts and answers for any API path.
pub async fn api_endpoint(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    count_and_respond(&state.store, &headers, path)
}

fn count_and_respond(store: &CounterStore, headers: &HeaderMap, path: String) -> Response {
    if let Err(e) = validate_api_path(&path) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
            .into_response();
    }

    let url_path = format!("/api/{}", path);
    let namespace = traffic_namespace(headers);
    store.increment(namespace, &url_path);

    Json(json!({
        "message": format!("API endpoint: {}", url_path),
        "timestamp": unix_timestamp(),
    }))
    .into_response()
}

/// `GET /stats/`: ordered hit counts per namespace.
pub async fn stats(State(state): State<AppState>) -> Response {
    Json(json!({
        "real": state.store.snapshot(NAMESPACE_REAL),
        "test": state.store.snapshot(NAMESPACE_TEST),
    }))
    .into_response()
}

/// `POST /test/{num_requests}/`: run a synthetic load test against the
/// configured base URL and report the outcome.
pub async fn run_test(
    State(state): State<AppState>,
    Path(num_requests): Path<usize>,
) -> Response {
    let store = Arc::clone(&state.store);
    let trip_hook: TripHook = Arc::new(move || Ok(store.clear_namespace(NAMESPACE_TEST)));

    match run_synthetic_load(state.dispatch_config.clone(), Some(trip_hook), num_requests).await
    {
        Ok(result) => Json(result).into_response(),
        Err(e @ (DispatchError::InvalidRequestCount(_) | DispatchError::InvalidConfig(_))) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Dispatch run failed to start");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `GET /health`: liveness probe with basic store visibility.
pub async fn health(State(state): State<AppState>) -> Response {
    Json(json!({
        "status": "healthy",
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "tracked_paths": state.store.key_count(),
        "timestamp": unix_timestamp(),
    }))
    .into_response()
}
