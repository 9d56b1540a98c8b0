//! Application state shared across all HTTP handlers.

use std::sync::Arc;

use seatguard_auth::TokenIssuer;
use seatguard_core::ReservationCore;

use crate::ports::{OtpProvider, RateLimiter, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub core: ReservationCore,
    pub users: Arc<dyn UserDirectory>,
    pub otp: Arc<dyn OtpProvider>,
    pub tokens: TokenIssuer,
    pub rate_limiter: Arc<dyn RateLimiter>,
}
