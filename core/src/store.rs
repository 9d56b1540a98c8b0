//! Storage abstractions: the Hot State Store (HSS) and Durable Record
//! Store (DRS) traits that `ReservationCore` coordinates (spec.md §2, §5).
//!
//! Both traits return boxed futures rather than using `async fn` in trait
//! so that implementations can be stored as `Arc<dyn HotStateStore>` /
//! `Arc<dyn RecordStore>` and swapped at the composition root (production
//! Redis/Postgres adapters in `seatguard-redis`/`seatguard-postgres`, or
//! in-memory fakes in tests).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ReservationError;
use crate::types::{BookOutcome, Receipt, SeatCacheEntry, SeatId, SeatRecord, UserId};

/// A future boxed for storage in a trait object, matching the idiom used
/// by this codebase's other cross-boundary abstractions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The fast in-memory store with per-key TTL and server-side atomic
/// scripts (spec.md §2 item 1, §4.1).
///
/// Every method here must be linearizable per key: implementations are
/// expected to use a single atomic script (e.g. a Lua script evaluated by
/// Redis) rather than a read-then-write round trip, or a per-seat mutex if
/// no such facility exists (spec.md §9, "Single-key atomic script").
pub trait HotStateStore: Send + Sync {
    /// Atomically acquire `seat:{seat_id}` for `user_id` if it is absent,
    /// with the given TTL. Returns `Conflict` if the key already holds a
    /// `LOCKED` or `SOLD` value (spec.md §4.1.1).
    fn hold<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<crate::types::HoldOutcome, ReservationError>>;

    /// Atomically delete `seat:{seat_id}` only if it currently equals
    /// `LOCKED:{user_id}`. Never errors for a missing or foreign lock
    /// (spec.md §4.1.2).
    fn release<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
    ) -> BoxFuture<'a, Result<(), ReservationError>>;

    /// Overwrite `seat:{seat_id}` with `SOLD`, no TTL, regardless of its
    /// prior value (spec.md §4.1.3 step 5, §9 open question (c)).
    fn mark_sold<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<(), ReservationError>>;

    /// Read the current `seat:{seat_id}` entry, if any, with its remaining
    /// TTL.
    fn get_lock<'a>(
        &'a self,
        seat_id: &'a SeatId,
    ) -> BoxFuture<'a, Result<Option<SeatCacheEntry>, ReservationError>>;

    /// Scan all `seat:*` keys for the snapshot overlay (spec.md §4.1.4).
    fn scan_locks(&self) -> BoxFuture<'_, Result<Vec<(SeatId, SeatCacheEntry)>, ReservationError>>;

    /// Read a previously published receipt for an idempotency key.
    fn get_receipt<'a>(
        &'a self,
        idempotency_key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Receipt>, ReservationError>>;

    /// Publish a receipt for an idempotency key with the given retention.
    fn put_receipt<'a>(
        &'a self,
        idempotency_key: &'a str,
        receipt: &'a Receipt,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<(), ReservationError>>;

    /// Clear every key in the store (spec.md §4.4 admin reset).
    fn clear_all(&self) -> BoxFuture<'_, Result<(), ReservationError>>;
}

/// The durable, ordered seat ledger with multi-statement transactions and
/// a unique constraint on `seat_id` (spec.md §2 item 2, §4.1).
pub trait RecordStore: Send + Sync {
    /// All seat records, for the snapshot read and for admin reset.
    fn list_seats(&self) -> BoxFuture<'_, Result<Vec<SeatRecord>, ReservationError>>;

    /// A single seat record, if it exists.
    fn get_seat<'a>(
        &'a self,
        seat_id: &'a SeatId,
    ) -> BoxFuture<'a, Result<Option<SeatRecord>, ReservationError>>;

    /// Inside one transaction: find the seat, abort with `AlreadyBooked` if
    /// its status is already `booked`, otherwise set `status = booked,
    /// user_id = user_id` and commit (spec.md §4.1.3 steps 3-4).
    fn book_seat<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
    ) -> BoxFuture<'a, Result<BookOutcome, ReservationError>>;

    /// Reset every seat to `available` with no holder (spec.md §4.4).
    fn reset_all(&self) -> BoxFuture<'_, Result<(), ReservationError>>;
}
