//! `POST /api/reset` (spec.md §4.4, §6): deliberately unauthenticated — a
//! known limitation, not an oversight (see DESIGN.md).

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub async fn reset(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.core.reset().await?;
    Ok(Json(json!({ "success": true })))
}
