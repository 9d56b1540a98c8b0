//! `GET /api/seats` (spec.md §6): unauthenticated, unthrottled snapshot
//! read.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use seatguard_core::{SeatView, SeatViewState};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SeatsResponse {
    pub seats: Vec<Value>,
}

fn to_wire(view: SeatView) -> Value {
    let mut obj = json!({
        "id": view.seat_id.0,
        "row": view.row,
        "number": view.number,
        "tier": match view.tier {
            seatguard_core::Tier::Vip => "vip",
            seatguard_core::Tier::Premium => "premium",
            seatguard_core::Tier::Standard => "standard",
        },
        "price": view.price,
    });

    let map = obj.as_object_mut().expect("object literal");
    match view.state {
        SeatViewState::Available => {
            map.insert("state".into(), json!("available"));
        }
        SeatViewState::Booked => {
            map.insert("state".into(), json!("booked"));
        }
        SeatViewState::Locked { locked_by, ttl } => {
            map.insert("state".into(), json!("locked"));
            map.insert("lockedBy".into(), json!(locked_by.0));
            map.insert("ttl".into(), json!(ttl));
        }
    }
    obj
}

pub async fn list_seats(State(state): State<AppState>) -> Result<Json<SeatsResponse>, AppError> {
    let views = state.core.snapshot().await?;
    Ok(Json(SeatsResponse {
        seats: views.into_iter().map(to_wire).collect(),
    }))
}
