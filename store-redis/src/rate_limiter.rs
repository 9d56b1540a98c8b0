//! Token-bucket rate limiting, spec.md §4.2 ("Per-user and per-IP rate
//! limits, enforced with a token bucket").
//!
//! The teacher's `auth/src/stores/rate_limiter_redis.rs` enforces a sliding
//! window with a sorted set; a token bucket has different state (tokens
//! remaining, last refill timestamp) but the same atomicity requirement, so
//! the refill-then-consume arithmetic below is done inside a single
//! `redis::Script` rather than the teacher's atomic pipeline, since the
//! refill amount depends on reading the clock and the prior state together.

use redis::aio::ConnectionManager;
use redis::Script;
use seatguard_core::{ReservationError, Result};

const TAKE_SCRIPT: &str = r#"
local key = KEYS[1]
local capacity = tonumber(ARGV[1])
local refill_per_sec = tonumber(ARGV[2])
local now_ms = tonumber(ARGV[3])
local ttl_sec = tonumber(ARGV[4])

local state = redis.call('HMGET', key, 'tokens', 'ts')
local tokens = tonumber(state[1])
local last_ts = tonumber(state[2])

if tokens == nil then
    tokens = capacity
    last_ts = now_ms
end

local elapsed_sec = math.max(0, (now_ms - last_ts) / 1000)
tokens = math.min(capacity, tokens + elapsed_sec * refill_per_sec)

local allowed = 0
if tokens >= 1 then
    tokens = tokens - 1
    allowed = 1
end

redis.call('HMSET', key, 'tokens', tokens, 'ts', now_ms)
redis.call('EXPIRE', key, ttl_sec)

return { allowed, tokens }
"#;

/// A named token bucket: `capacity` tokens, refilled at `refill_per_sec`.
#[derive(Debug, Clone, Copy)]
pub struct BucketSpec {
    pub capacity: u32,
    pub refill_per_sec: f64,
}

impl BucketSpec {
    /// spec.md §4.2: 10 hold/release calls per second per user.
    #[must_use]
    pub const fn hold_per_user() -> Self {
        Self {
            capacity: 10,
            refill_per_sec: 10.0,
        }
    }

    /// spec.md §4.2: 50 auth attempts per 15 minutes per IP.
    #[must_use]
    pub fn auth_per_ip() -> Self {
        Self {
            capacity: 50,
            refill_per_sec: 50.0 / (15.0 * 60.0),
        }
    }
}

/// Redis-backed token-bucket limiter shared by the hold/release and auth
/// endpoints.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    conn: ConnectionManager,
    script: &'static Script,
}

impl TokenBucketRateLimiter {
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        let script: &'static Script = Box::leak(Box::new(Script::new(TAKE_SCRIPT)));
        Self { conn, script }
    }

    /// Attempt to take one token from `bucket_key`'s bucket. `now_ms` is the
    /// caller-supplied wall-clock time so tests can drive it deterministically.
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is unreachable or the script fails.
    pub async fn try_take(
        &self,
        bucket_key: &str,
        spec: BucketSpec,
        now_ms: i64,
    ) -> Result<bool> {
        let mut conn = self.conn.clone();
        let (allowed, _remaining): (i64, f64) = self
            .script
            .key(bucket_key)
            .arg(spec.capacity)
            .arg(spec.refill_per_sec)
            .arg(now_ms)
            .arg(3600)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| ReservationError::Internal(format!("rate limiter script failed: {e}")))?;
        Ok(allowed == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_bucket_matches_spec() {
        let spec = BucketSpec::hold_per_user();
        assert_eq!(spec.capacity, 10);
        assert!((spec.refill_per_sec - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn auth_bucket_matches_spec() {
        let spec = BucketSpec::auth_per_ip();
        assert_eq!(spec.capacity, 50);
        assert!((spec.refill_per_sec - 50.0 / 900.0).abs() < 1e-9);
    }
}
