//! Custom Axum extractors.
//!
//! `CorrelationId` and `ClientIp` are adapted nearly verbatim from the
//! teacher's `web/src/extractors.rs`. `AuthUser` is new: spec.md §4.3's
//! Authentication Gate, implemented as a `FromRequestParts<AppState>` that
//! verifies the bearer token locally (no HSS/DRS round trip) rather than
//! the teacher's session-store lookup.

use std::net::IpAddr;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use seatguard_core::UserId;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Correlation ID for request tracing (`X-Correlation-ID` header, or a
/// freshly generated UUID v4).
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get("X-Correlation-ID")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        Ok(Self(correlation_id))
    }
}

/// The rate limiter's key-derivation address (spec.md §4.2): first hop of
/// `X-Forwarded-For` if present, else the TCP peer address.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_client_ip(&parts.headers)))
    }
}

fn extract_client_ip(headers: &HeaderMap) -> IpAddr {
    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }
    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip) = real_ip.to_str().unwrap_or_default().parse::<IpAddr>() {
            return ip;
        }
    }
    "127.0.0.1".parse().expect("valid fallback IP")
}

/// The caller's `user_id`, established by verifying the bearer token
/// (spec.md §4.3). Handlers MUST use this, never a `userId` field carried
/// in the request body, for authorization decisions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::unauthenticated)?;

        let user_id = state.tokens.verify(token).map_err(|_| AppError::forbidden())?;
        Ok(Self(user_id))
    }
}
