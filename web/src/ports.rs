//! Trait objects for the auth supplement's storage, in the same
//! `Arc<dyn Trait>` shape as `seatguard_core::{HotStateStore, RecordStore}`,
//! so handlers can be exercised against in-memory fakes the way
//! `seatguard-core`'s own tests exercise `ReservationCore`.

use std::future::Future;
use std::pin::Pin;

use seatguard_core::UserId;
use seatguard_postgres::UserRecord;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait OtpProvider: Send + Sync {
    fn issue<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<String, sqlx_like::Error>>;
    fn verify<'a>(
        &'a self,
        email: &'a str,
        candidate: &'a str,
    ) -> BoxFuture<'a, Result<bool, sqlx_like::Error>>;
}

pub trait UserDirectory: Send + Sync {
    fn create<'a>(
        &'a self,
        user_id: &'a UserId,
        email: &'a str,
        password_hash: &'a str,
        phone: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), sqlx_like::Error>>;

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, sqlx_like::Error>>;
}

/// A named token bucket, checked on every rate-limited request.
pub trait RateLimiter: Send + Sync {
    fn try_take<'a>(
        &'a self,
        bucket_key: &'a str,
        spec: seatguard_redis::rate_limiter::BucketSpec,
        now_ms: i64,
    ) -> BoxFuture<'a, seatguard_core::Result<bool>>;
}

/// A storage-agnostic error for the two ports above, so in-memory test
/// fakes don't need to fabricate a `sqlx::Error` or `redis::RedisError`.
pub mod sqlx_like {
    use std::fmt;

    #[derive(Debug)]
    pub struct Error(pub String);

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for Error {}
}
