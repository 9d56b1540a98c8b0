//! In-memory `OtpProvider`/`UserDirectory`/`RateLimiter` fakes, in the same
//! spirit as `seatguard_core::fakes` — gated behind `test-util` so
//! `seatguard-web`'s own integration tests can build an `AppState` without a
//! live Redis or Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use seatguard_core::UserId;
use seatguard_postgres::UserRecord;
use seatguard_redis::rate_limiter::BucketSpec;

use crate::ports::{sqlx_like::Error as PortError, BoxFuture, OtpProvider, RateLimiter, UserDirectory};

/// An in-memory OTP store. Codes never expire, which is fine for tests that
/// control their own timeline explicitly.
#[derive(Default)]
pub struct InMemoryOtpProvider {
    codes: Mutex<HashMap<String, String>>,
}

impl InMemoryOtpProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets a test read back the code it would otherwise have to scrape out
    /// of a log line.
    #[must_use]
    pub fn peek(&self, email: &str) -> Option<String> {
        self.codes.lock().expect("lock poisoned").get(email).cloned()
    }
}

impl OtpProvider for InMemoryOtpProvider {
    fn issue<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<String, PortError>> {
        Box::pin(async move {
            let code = "000000".to_string();
            self.codes
                .lock()
                .expect("lock poisoned")
                .insert(email.to_string(), code.clone());
            Ok(code)
        })
    }

    fn verify<'a>(&'a self, email: &'a str, candidate: &'a str) -> BoxFuture<'a, Result<bool, PortError>> {
        Box::pin(async move {
            let mut codes = self.codes.lock().expect("lock poisoned");
            if codes.get(email).map(String::as_str) == Some(candidate) {
                codes.remove(email);
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }
}

/// An in-memory user directory, keyed by email.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn create<'a>(
        &'a self,
        user_id: &'a UserId,
        email: &'a str,
        password_hash: &'a str,
        phone: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), PortError>> {
        Box::pin(async move {
            let mut users = self.users.lock().expect("lock poisoned");
            if users.contains_key(email) {
                return Err(PortError("duplicate key value violates unique constraint".to_string()));
            }
            users.insert(
                email.to_string(),
                UserRecord {
                    user_id: user_id.clone(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    phone: phone.map(str::to_string),
                },
            );
            Ok(())
        })
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<Option<UserRecord>, PortError>> {
        Box::pin(async move { Ok(self.users.lock().expect("lock poisoned").get(email).cloned()) })
    }
}

/// A rate limiter that always allows the request, for tests that exercise
/// business logic without exercising spec.md §4.2 itself.
#[derive(Default)]
pub struct AlwaysAllowRateLimiter;

impl AlwaysAllowRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RateLimiter for AlwaysAllowRateLimiter {
    fn try_take<'a>(
        &'a self,
        _bucket_key: &'a str,
        _spec: BucketSpec,
        _now_ms: i64,
    ) -> BoxFuture<'a, seatguard_core::Result<bool>> {
        Box::pin(async move { Ok(true) })
    }
}

/// A rate limiter that always denies, for exercising the 429 path.
#[derive(Default)]
pub struct AlwaysDenyRateLimiter;

impl AlwaysDenyRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RateLimiter for AlwaysDenyRateLimiter {
    fn try_take<'a>(
        &'a self,
        _bucket_key: &'a str,
        _spec: BucketSpec,
        _now_ms: i64,
    ) -> BoxFuture<'a, seatguard_core::Result<bool>> {
        Box::pin(async move { Ok(false) })
    }
}
