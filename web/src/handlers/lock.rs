//! `POST /api/lock` (spec.md §6, §4.1.1): authenticated, rate-limited.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seatguard_core::{ReservationError, SeatId};

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    #[serde(rename = "seatId")]
    seat_id: String,
}

pub async fn lock_seat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<LockRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if body.seat_id.trim().is_empty() {
        return Err(AppError::invalid_payload("seatId must not be empty"));
    }

    let seat_id = SeatId::from(body.seat_id);
    match state.core.hold(&seat_id, &user_id).await {
        Ok(()) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Err(ReservationError::Unavailable) => Ok((
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Seat Unavailable" })),
        )),
        Err(err) => Err(err.into()),
    }
}
