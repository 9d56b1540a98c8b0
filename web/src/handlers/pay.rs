//! `POST /api/pay` (spec.md §6, §4.1.3): authenticated, not rate-limited
//! (idempotency is the retry mechanism for this endpoint, per spec.md §7).

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
pub struct PayRequest {
    #[serde(rename = "idempotencyKey")]
    idempotency_key: String,
    #[serde(rename = "seatId")]
    seat_id: String,
}

pub async fn pay(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PayRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if body.idempotency_key.trim().is_empty() || body.seat_id.trim().is_empty() {
        return Err(AppError::invalid_payload(
            "idempotencyKey and seatId must not be empty",
        ));
    }

    let seat_id = SeatId::from(body.seat_id);
    match state
        .core
        .purchase(&body.idempotency_key, &seat_id, &user_id)
        .await
    {
        Ok(receipt) => Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "txId": receipt.tx_id })),
        )),
        Err(err @ ReservationError::LockExpiredOrStolen) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": err.to_string() })),
        )),
        Err(err) => Err(err.into()),
    }
}
