//! Health and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use persistence::store::StoreKey;
use serde_json::{json, Value};

use crate::app::AppState;

/// Basic health check.
///
/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe.
///
/// GET /api/health/live
pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe; issues a point read against the store.
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // The probe key never exists; only reachability matters.
    match state.store.get(&StoreKey::new("HEALTH", "PROBE")).await {
        Ok(_) => Ok(Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!("Readiness probe failed: {}", err);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
