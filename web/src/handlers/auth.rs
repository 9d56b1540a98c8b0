//! `/api/auth/*` (spec.md §6, §2's auth supplement): register issues an
//! OTP out of band, verify-register consumes it and creates the account,
//! login exchanges a password for a bearer token.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use seatguard_auth::{password, AuthError};
use seatguard_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    email: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    if body.email.trim().is_empty() {
        return Err(AppError::invalid_payload("email must not be empty"));
    }
    if state.users.find_by_email(&body.email).await?.is_some() {
        return Err(AuthError::EmailAlreadyRegistered.into());
    }

    let code = state.otp.issue(&body.email).await?;
    tracing::info!(email = %body.email, otp = %code, "verification code issued");
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRegisterRequest {
    email: String,
    otp: String,
    password: String,
    #[serde(default)]
    phone: Option<String>,
}

pub async fn verify_register(
    State(state): State<AppState>,
    Json(body): Json<VerifyRegisterRequest>,
) -> Result<Json<Value>, AppError> {
    if body.email.trim().is_empty() || body.otp.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::invalid_payload("email, otp and password are required"));
    }

    if !state.otp.verify(&body.email, &body.otp).await? {
        return Err(AuthError::InvalidOtp.into());
    }

    let user_id = UserId::from(Uuid::new_v4().to_string());
    let hashed = password::hash(&body.password)?;
    state
        .users
        .create(&user_id, &body.email, &hashed, body.phone.as_deref())
        .await?;

    let token = state.tokens.issue(&user_id)?;
    Ok(Json(json!({
        "success": true,
        "token": token,
        "userId": user_id.0,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    password::verify(&body.password, &user.password_hash)?;

    let token = state.tokens.issue(&user.user_id)?;
    Ok(Json(json!({
        "success": true,
        "token": token,
        "userId": user.user_id.0,
    })))
}
