//! Integration tests against a live Redis, in the teacher's
//! `#[ignore] // Requires Redis running` style (see
//! `auth/src/stores/session_redis.rs`). Point `REDIS_URL` at a throwaway
//! instance before running with `cargo test -- --ignored`.

use std::time::Duration;

use seatguard_core::{HoldOutcome, HotStateStore, LockKind, Receipt, SeatId, UserId};
use seatguard_redis::otp::OtpStore;
use seatguard_redis::rate_limiter::{BucketSpec, TokenBucketRateLimiter};
use seatguard_redis::RedisHotStateStore;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

async fn connect() -> RedisHotStateStore {
    let store = RedisHotStateStore::connect(&redis_url())
        .await
        .expect("Redis must be reachable for this test");
    store.clear_all().await.expect("failed to reset Redis state");
    store
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn holding_a_free_seat_acquires_the_lock() {
    let store = connect().await;
    let seat_id = SeatId::from("A1");
    let user_id = UserId::from("alice");

    let outcome = store
        .hold(&seat_id, &user_id, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(outcome, HoldOutcome::Acquired);

    let entry = store.get_lock(&seat_id).await.unwrap().unwrap();
    assert_eq!(entry.kind, LockKind::Locked(user_id));
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn a_second_hold_on_a_locked_seat_conflicts() {
    let store = connect().await;
    let seat_id = SeatId::from("A2");

    store
        .hold(&seat_id, &UserId::from("alice"), Duration::from_secs(5))
        .await
        .unwrap();
    let outcome = store
        .hold(&seat_id, &UserId::from("bob"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(outcome, HoldOutcome::Conflict);
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn releasing_a_foreign_hold_is_a_no_op() {
    let store = connect().await;
    let seat_id = SeatId::from("A3");

    store
        .hold(&seat_id, &UserId::from("alice"), Duration::from_secs(5))
        .await
        .unwrap();
    store.release(&seat_id, &UserId::from("bob")).await.unwrap();

    let entry = store.get_lock(&seat_id).await.unwrap().unwrap();
    assert_eq!(entry.kind, LockKind::Locked(UserId::from("alice")));
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn marking_a_seat_sold_survives_a_subsequent_hold_attempt() {
    let store = connect().await;
    let seat_id = SeatId::from("A4");

    store.mark_sold(&seat_id).await.unwrap();
    let outcome = store
        .hold(&seat_id, &UserId::from("alice"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(outcome, HoldOutcome::Conflict);
    let entry = store.get_lock(&seat_id).await.unwrap().unwrap();
    assert_eq!(entry.kind, LockKind::Sold);
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn a_receipt_is_written_once_per_idempotency_key() {
    let store = connect().await;
    let receipt = Receipt {
        success: true,
        tx_id: "tx-1".to_string(),
        seat_id: SeatId::from("A5"),
        user_id: UserId::from("alice"),
        issued_at: chrono::Utc::now(),
    };

    store
        .put_receipt("idem-1", &receipt, Duration::from_secs(60))
        .await
        .unwrap();
    let read_back = store.get_receipt("idem-1").await.unwrap().unwrap();
    assert_eq!(read_back.tx_id, "tx-1");

    let other = Receipt {
        tx_id: "tx-2".to_string(),
        ..receipt
    };
    store
        .put_receipt("idem-1", &other, Duration::from_secs(60))
        .await
        .unwrap();
    let still_first = store.get_receipt("idem-1").await.unwrap().unwrap();
    assert_eq!(still_first.tx_id, "tx-1");
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn otp_codes_are_single_use() {
    let store = connect().await;
    let otp = OtpStore::new(store.connection());

    let code = otp.issue("alice@example.com").await.unwrap();
    assert!(otp.verify("alice@example.com", &code).await.unwrap());
    assert!(!otp.verify("alice@example.com", &code).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis running
async fn token_bucket_denies_once_capacity_is_exhausted() {
    let store = connect().await;
    let limiter = TokenBucketRateLimiter::new(store.connection());
    let spec = BucketSpec {
        capacity: 2,
        refill_per_sec: 0.0,
    };

    assert!(limiter.try_take("bucket:test", spec, 1_000).await.unwrap());
    assert!(limiter.try_take("bucket:test", spec, 1_000).await.unwrap());
    assert!(!limiter.try_take("bucket:test", spec, 1_000).await.unwrap());
}
