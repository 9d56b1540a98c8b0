//! Redis-backed Hot State Store (spec.md §2 item 1, §6 "State key layout").
//!
//! The seat lock/sold CAS uses a `redis::Script` evaluated server-side so
//! the check-then-set in [`HotStateStore::hold`]/`release` never
//! interleaves with another client's script on the same key, following the
//! atomic bulk-delete idiom in the teacher's
//! `auth/src/stores/session_redis.rs`. Everything else (receipts, OTPs,
//! the rate limiter) reuses the same `ConnectionManager` and the
//! GET/`SET EX`/pipeline patterns from `auth/src/stores/*_redis.rs` and
//! `examples/ticketing/src/api/idempotency.rs`.

pub mod otp;
pub mod rate_limiter;

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use seatguard_core::{
    BoxFuture, HoldOutcome, HotStateStore, LockKind, Receipt, ReservationError, Result,
    SeatCacheEntry, SeatId, UserId,
};

const HOLD_SCRIPT: &str = r#"
local key = KEYS[1]
local holder = ARGV[1]
local ttl = tonumber(ARGV[2])
if redis.call('EXISTS', key) == 1 then
    return 0
end
redis.call('SET', key, 'LOCKED:' .. holder, 'EX', ttl)
return 1
"#;

const RELEASE_SCRIPT: &str = r#"
local key = KEYS[1]
local want = 'LOCKED:' .. ARGV[1]
if redis.call('GET', key) == want then
    redis.call('DEL', key)
end
return 1
"#;

fn seat_key(seat_id: &SeatId) -> String {
    format!("seat:{seat_id}")
}

fn receipt_key(idempotency_key: &str) -> String {
    format!("receipt:{idempotency_key}")
}

fn decode(value: &str) -> LockKind {
    match value.strip_prefix("LOCKED:") {
        Some(holder) => LockKind::Locked(UserId::from(holder)),
        None => LockKind::Sold,
    }
}

fn redis_err(context: &str, err: redis::RedisError) -> ReservationError {
    ReservationError::Internal(format!("{context}: {err}"))
}

/// Redis-backed implementation of [`HotStateStore`].
#[derive(Clone)]
pub struct RedisHotStateStore {
    conn: ConnectionManager,
    hold_script: &'static Script,
    release_script: &'static Script,
}

impl RedisHotStateStore {
    /// A cloned handle to the underlying connection, for callers (the rate
    /// limiter, the OTP cache) that need a `ConnectionManager` of their own
    /// without opening a second TCP connection.
    #[must_use]
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Connect to Redis at `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| redis_err("failed to create Redis client", e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| redis_err("failed to create Redis connection manager", e))?;

        // `Script` compiles the source once; leak it so every clone of this
        // store shares the same compiled script rather than recompiling it
        // per call.
        let hold_script: &'static Script = Box::leak(Box::new(Script::new(HOLD_SCRIPT)));
        let release_script: &'static Script = Box::leak(Box::new(Script::new(RELEASE_SCRIPT)));

        Ok(Self {
            conn,
            hold_script,
            release_script,
        })
    }
}

impl HotStateStore for RedisHotStateStore {
    fn hold<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<HoldOutcome>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let acquired: i64 = self
                .hold_script
                .key(seat_key(seat_id))
                .arg(user_id.0.as_str())
                .arg(ttl.as_secs())
                .invoke_async(&mut conn)
                .await
                .map_err(|e| redis_err("hold script failed", e))?;

            if acquired == 1 {
                Ok(HoldOutcome::Acquired)
            } else {
                Ok(HoldOutcome::Conflict)
            }
        })
    }

    fn release<'a>(&'a self, seat_id: &'a SeatId, user_id: &'a UserId) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let _: i64 = self
                .release_script
                .key(seat_key(seat_id))
                .arg(user_id.0.as_str())
                .invoke_async(&mut conn)
                .await
                .map_err(|e| redis_err("release script failed", e))?;
            Ok(())
        })
    }

    fn mark_sold<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            // A plain SET with no EX both overwrites the prior LOCKED value
            // and clears its TTL, giving SOLD persistent-key semantics.
            let _: () = conn
                .set(seat_key(seat_id), "SOLD")
                .await
                .map_err(|e| redis_err("failed to mark seat sold", e))?;
            Ok(())
        })
    }

    fn get_lock<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<Option<SeatCacheEntry>>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let key = seat_key(seat_id);
            let value: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| redis_err("failed to read seat key", e))?;

            let Some(value) = value else {
                return Ok(None);
            };
            let kind = decode(&value);
            let ttl_remaining = match kind {
                LockKind::Sold => None,
                LockKind::Locked(_) => {
                    let ttl: i64 = conn
                        .ttl(&key)
                        .await
                        .map_err(|e| redis_err("failed to read seat TTL", e))?;
                    (ttl > 0).then(|| Duration::from_secs(ttl as u64))
                }
            };
            Ok(Some(SeatCacheEntry { kind, ttl_remaining }))
        })
    }

    fn scan_locks(&self) -> BoxFuture<'_, Result<Vec<(SeatId, SeatCacheEntry)>>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let mut cursor = 0u64;
            let mut keys = Vec::new();
            loop {
                let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg("seat:*")
                    .arg("COUNT")
                    .arg(200)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| redis_err("SCAN failed", e))?;
                keys.extend(batch);
                if next_cursor == 0 {
                    break;
                }
                cursor = next_cursor;
            }

            let mut entries = Vec::with_capacity(keys.len());
            for key in keys {
                let Some(seat_id) = key.strip_prefix("seat:") else {
                    continue;
                };
                let seat_id = SeatId::from(seat_id);
                if let Some(entry) = self.get_lock(&seat_id).await? {
                    entries.push((seat_id, entry));
                }
            }
            Ok(entries)
        })
    }

    fn get_receipt<'a>(&'a self, idempotency_key: &'a str) -> BoxFuture<'a, Result<Option<Receipt>>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let raw: Option<String> = conn
                .get(receipt_key(idempotency_key))
                .await
                .map_err(|e| redis_err("failed to read receipt", e))?;
            match raw {
                None => Ok(None),
                Some(json) => serde_json::from_str(&json)
                    .map(Some)
                    .map_err(|e| ReservationError::Internal(format!("bad receipt encoding: {e}"))),
            }
        })
    }

    fn put_receipt<'a>(
        &'a self,
        idempotency_key: &'a str,
        receipt: &'a Receipt,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let json = serde_json::to_string(receipt)
                .map_err(|e| ReservationError::Internal(format!("failed to encode receipt: {e}")))?;
            // NX so a losing racer's write never clobbers the winner's
            // receipt (spec.md I5: receipts are write-once per key).
            let _: () = redis::cmd("SET")
                .arg(receipt_key(idempotency_key))
                .arg(json)
                .arg("EX")
                .arg(ttl.as_secs())
                .arg("NX")
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_err("failed to publish receipt", e))?;
            Ok(())
        })
    }

    fn clear_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut conn = self.conn.clone();
            let _: () = redis::cmd("FLUSHDB")
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_err("FLUSHDB failed", e))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_locked_and_sold_values() {
        assert_eq!(decode("SOLD"), LockKind::Sold);
        assert_eq!(decode("LOCKED:42"), LockKind::Locked(UserId::from("42")));
    }

    // Everything else needs a live Redis; see `tests/redis_integration.rs`.
}
