// src/routes/health.rs
//! Liveness endpoint for the weather belief service.
//!
//! `GET /health` answers without reading the weather dataset, so it reports
//! on the process only. A missing or broken CSV file shows up as 503s on the
//! forecast routes, not here.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Subrouter with the `/health` route, generic over the gateway's state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
