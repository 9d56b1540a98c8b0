//! Token-bucket rate limiting (spec.md §4.2), applied as a `tower::Layer`
//! in the teacher's `correlation_id_layer` style rather than per-handler
//! code, so a rejected request never touches the Reservation Core.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use seatguard_redis::rate_limiter::BucketSpec;

use crate::error::AppError;
use crate::state::AppState;

fn peer_key(req: &Request) -> String {
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(first) = s.split(',').next() {
                return first.trim().to_string();
            }
        }
    }
    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(s) = real_ip.to_str() {
            return s.to_string();
        }
    }
    "127.0.0.1".to_string()
}

async fn take(state: &AppState, bucket: &str, spec: BucketSpec, req: &Request) -> Result<(), AppError> {
    let key = format!("ratelimit:{bucket}:{}", peer_key(req));
    #[allow(clippy::cast_possible_truncation)]
    let now_ms = chrono::Utc::now().timestamp_millis();
    let allowed = state.rate_limiter.try_take(&key, spec, now_ms).await?;
    if allowed {
        Ok(())
    } else {
        Err(AppError::rate_limited())
    }
}

/// Applies to `POST /api/lock` (spec.md §4.2's "hold traffic" bucket).
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    take(&state, "hold", BucketSpec::hold_per_user(), &req).await?;
    Ok(next.run(req).await)
}

/// Applies to the `/api/auth/*` endpoints (spec.md §4.2's "authentication
/// traffic" bucket).
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    take(&state, "auth", BucketSpec::auth_per_ip(), &req).await?;
    Ok(next.run(req).await)
}
