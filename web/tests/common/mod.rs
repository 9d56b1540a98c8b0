//! Shared fixtures for the HTTP-level integration tests below, building an
//! `AppState` entirely out of in-memory fakes so these tests need neither a
//! live Redis nor a live Postgres.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use seatguard_core::fakes::{InMemoryHotStateStore, InMemoryRecordStore};
use seatguard_core::ReservationCore;
use seatguard_web::fakes::{AlwaysAllowRateLimiter, InMemoryOtpProvider, InMemoryUserDirectory};
use seatguard_web::ports::{OtpProvider, RateLimiter, UserDirectory};
use seatguard_web::{build_router, seed, AppState};

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret-do-not-use-in-prod";

pub fn test_app() -> Router {
    test_app_with_rate_limiter(Arc::new(AlwaysAllowRateLimiter::new()))
}

pub fn test_app_with_rate_limiter(rate_limiter: Arc<dyn RateLimiter>) -> Router {
    let core = ReservationCore::new(
        Arc::new(InMemoryHotStateStore::new()),
        Arc::new(InMemoryRecordStore::new(seed::fixed_layout())),
    );
    let state = AppState {
        core,
        users: Arc::new(InMemoryUserDirectory::new()) as Arc<dyn UserDirectory>,
        otp: Arc::new(InMemoryOtpProvider::new()) as Arc<dyn OtpProvider>,
        tokens: seatguard_auth::TokenIssuer::new(TEST_JWT_SECRET, Duration::from_secs(3600)),
        rate_limiter,
    };
    build_router(state)
}

pub fn bearer_token_for(user_id: &str) -> String {
    let tokens = seatguard_auth::TokenIssuer::new(TEST_JWT_SECRET, Duration::from_secs(3600));
    tokens
        .issue(&seatguard_core::UserId::from(user_id))
        .expect("token issuance should not fail in a test")
}
