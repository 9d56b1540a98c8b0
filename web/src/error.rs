//! Error types for web handlers, bridging domain errors to HTTP responses.
//!
//! Adapted from the teacher's `web/src/error.rs`: same status/message/code
//! shape and the same "only log 5xx" policy, but the response body matches
//! spec.md §6's `{"error": <string>}` wire shape instead of the teacher's
//! `{"code", "message"}` pair.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use seatguard_auth::AuthError;
use seatguard_core::ReservationError;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    code: &'static str,
    source: Option<anyhow::Error>,
}

impl AppError {
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", message)
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "missing or malformed authorization header",
        )
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", "invalid bearer token")
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "too many requests, slow down",
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                error = self.source.as_ref().map(ToString::to_string),
                "internal server error"
            );
        }

        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps each domain error to the status code spec.md §7 assigns it.
impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Unavailable => Self::new(
                StatusCode::CONFLICT,
                "UNAVAILABLE",
                "seat is currently locked by another user or sold",
            ),
            ReservationError::LockExpiredOrStolen => Self::new(
                StatusCode::BAD_REQUEST,
                "LOCK_EXPIRED_OR_STOLEN",
                "hold expired or was stolen; re-acquire the hold and retry",
            ),
            ReservationError::AlreadySold => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ALREADY_SOLD",
                "seat already sold",
            )
            .with_source(anyhow::anyhow!("DRS booked with no receipt on record")),
            ReservationError::Internal(msg) => Self::internal("a server error occurred")
                .with_source(anyhow::anyhow!(msg)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidOtp => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", err.to_string())
            }
            AuthError::EmailAlreadyRegistered => {
                Self::new(StatusCode::CONFLICT, "UNAVAILABLE", err.to_string())
            }
            AuthError::TokenInvalid => Self::forbidden(),
            AuthError::TokenExpired => Self::forbidden(),
            AuthError::TooManyAttempts { .. } => Self::rate_limited(),
            AuthError::Internal(msg) => {
                Self::internal("a server error occurred").with_source(anyhow::anyhow!(msg))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::new(StatusCode::CONFLICT, "UNAVAILABLE", "already exists");
            }
        }
        Self::internal("a server error occurred").with_source(err)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::internal("a server error occurred").with_source(err)
    }
}

impl From<crate::ports::sqlx_like::Error> for AppError {
    fn from(err: crate::ports::sqlx_like::Error) -> Self {
        Self::internal("a server error occurred").with_source(anyhow::anyhow!(err.0))
    }
}
