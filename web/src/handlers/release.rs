//! `POST /api/release` (spec.md §6, §4.1.2): unauthenticated and
//! permissive by design — the Auth Gate protects hold *acquisition* and
//! *purchase*, not relinquishing a hold the caller claims as their own.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seatguard_core::{SeatId, UserId};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    #[serde(rename = "seatId")]
    seat_id: String,
    #[serde(rename = "userId")]
    user_id: String,
}

pub async fn release_seat(
    State(state): State<AppState>,
    Json(body): Json<ReleaseRequest>,
) -> Result<Json<Value>, AppError> {
    if body.seat_id.trim().is_empty() || body.user_id.trim().is_empty() {
        return Err(AppError::invalid_payload("seatId and userId must not be empty"));
    }

    let seat_id = SeatId::from(body.seat_id);
    let user_id = UserId::from(body.user_id);
    state.core.release(&seat_id, &user_id).await?;
    Ok(Json(json!({ "success": true })))
}
