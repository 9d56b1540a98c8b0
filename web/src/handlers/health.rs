//! Liveness/readiness probes (spec.md §2's ambient supplement), in the
//! teacher's `server/health.rs` shape: `/health` never touches a
//! dependency, `/ready` does.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.core.snapshot().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "reason": err.to_string() })),
        ),
    }
}
