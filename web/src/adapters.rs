//! Wires the concrete Redis/Postgres stores into the `ports` traits.

use seatguard_core::UserId;
use seatguard_postgres::{PostgresUserStore, UserRecord};
use seatguard_redis::otp::OtpStore;
use seatguard_redis::rate_limiter::{BucketSpec, TokenBucketRateLimiter};

use crate::ports::{sqlx_like::Error as PortError, BoxFuture, OtpProvider, RateLimiter, UserDirectory};

impl OtpProvider for OtpStore {
    fn issue<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<String, PortError>> {
        Box::pin(async move {
            OtpStore::issue(self, email)
                .await
                .map_err(|e| PortError(e.to_string()))
        })
    }

    fn verify<'a>(
        &'a self,
        email: &'a str,
        candidate: &'a str,
    ) -> BoxFuture<'a, Result<bool, PortError>> {
        Box::pin(async move {
            OtpStore::verify(self, email, candidate)
                .await
                .map_err(|e| PortError(e.to_string()))
        })
    }
}

impl UserDirectory for PostgresUserStore {
    fn create<'a>(
        &'a self,
        user_id: &'a UserId,
        email: &'a str,
        password_hash: &'a str,
        phone: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), PortError>> {
        Box::pin(async move {
            PostgresUserStore::create(self, user_id, email, password_hash, phone)
                .await
                .map_err(|e| PortError(e.to_string()))
        })
    }

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, PortError>> {
        Box::pin(async move {
            PostgresUserStore::find_by_email(self, email)
                .await
                .map_err(|e| PortError(e.to_string()))
        })
    }
}

impl RateLimiter for TokenBucketRateLimiter {
    fn try_take<'a>(
        &'a self,
        bucket_key: &'a str,
        spec: BucketSpec,
        now_ms: i64,
    ) -> BoxFuture<'a, seatguard_core::Result<bool>> {
        Box::pin(async move { TokenBucketRateLimiter::try_take(self, bucket_key, spec, now_ms).await })
    }
}
