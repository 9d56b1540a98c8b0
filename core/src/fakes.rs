//! In-memory `HotStateStore`/`RecordStore` fakes.
//!
//! These back this crate's own unit tests and are re-exported (behind the
//! `test-util` feature) so `seatguard-web`'s router tests can exercise the
//! full HTTP surface without a live Redis or Postgres, the same way the
//! teacher's test-utils feature ships mock providers for its auth crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{ReservationError, Result};
use crate::store::{BoxFuture, HotStateStore, RecordStore};
use crate::types::{
    BookOutcome, HoldOutcome, LockKind, Receipt, Seat, SeatCacheEntry, SeatId, SeatRecord,
    SeatStatus, UserId,
};

enum CacheValue {
    Locked { holder: UserId, expires_at: Instant },
    Sold,
}

/// An in-memory Hot State Store. Each operation takes the same mutex for
/// its whole critical section, which is exactly what the single-key atomic
/// script requirement in spec.md §9 demands of a real implementation.
#[derive(Default)]
pub struct InMemoryHotStateStore {
    seats: Mutex<HashMap<SeatId, CacheValue>>,
    receipts: Mutex<HashMap<String, (Receipt, Instant)>>,
}

impl InMemoryHotStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn prune_locked(map: &mut HashMap<SeatId, CacheValue>, now: Instant) {
        map.retain(|_, v| match v {
            CacheValue::Locked { expires_at, .. } => *expires_at > now,
            CacheValue::Sold => true,
        });
    }
}

impl HotStateStore for InMemoryHotStateStore {
    fn hold<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<HoldOutcome>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut seats = self.seats.lock().expect("lock poisoned");
            Self::prune_locked(&mut seats, now);
            if seats.contains_key(seat_id) {
                return Ok(HoldOutcome::Conflict);
            }
            seats.insert(
                seat_id.clone(),
                CacheValue::Locked {
                    holder: user_id.clone(),
                    expires_at: now + ttl,
                },
            );
            Ok(HoldOutcome::Acquired)
        })
    }

    fn release<'a>(&'a self, seat_id: &'a SeatId, user_id: &'a UserId) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut seats = self.seats.lock().expect("lock poisoned");
            if let Some(CacheValue::Locked { holder, .. }) = seats.get(seat_id) {
                if holder == user_id {
                    seats.remove(seat_id);
                }
            }
            Ok(())
        })
    }

    fn mark_sold<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut seats = self.seats.lock().expect("lock poisoned");
            seats.insert(seat_id.clone(), CacheValue::Sold);
            Ok(())
        })
    }

    fn get_lock<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<Option<SeatCacheEntry>>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut seats = self.seats.lock().expect("lock poisoned");
            Self::prune_locked(&mut seats, now);
            Ok(seats.get(seat_id).map(|v| to_entry(v, now)))
        })
    }

    fn scan_locks(&self) -> BoxFuture<'_, Result<Vec<(SeatId, SeatCacheEntry)>>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut seats = self.seats.lock().expect("lock poisoned");
            Self::prune_locked(&mut seats, now);
            Ok(seats
                .iter()
                .map(|(id, v)| (id.clone(), to_entry(v, now)))
                .collect())
        })
    }

    fn get_receipt<'a>(&'a self, idempotency_key: &'a str) -> BoxFuture<'a, Result<Option<Receipt>>> {
        Box::pin(async move {
            let now = Instant::now();
            let receipts = self.receipts.lock().expect("lock poisoned");
            Ok(receipts
                .get(idempotency_key)
                .filter(|(_, expires_at)| *expires_at > now)
                .map(|(r, _)| r.clone()))
        })
    }

    fn put_receipt<'a>(
        &'a self,
        idempotency_key: &'a str,
        receipt: &'a Receipt,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut receipts = self.receipts.lock().expect("lock poisoned");
            receipts
                .entry(idempotency_key.to_string())
                .or_insert_with(|| (receipt.clone(), Instant::now() + ttl));
            Ok(())
        })
    }

    fn clear_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.seats.lock().expect("lock poisoned").clear();
            self.receipts.lock().expect("lock poisoned").clear();
            Ok(())
        })
    }
}

fn to_entry(value: &CacheValue, now: Instant) -> SeatCacheEntry {
    match value {
        CacheValue::Locked { holder, expires_at } => SeatCacheEntry {
            kind: LockKind::Locked(holder.clone()),
            ttl_remaining: Some(expires_at.saturating_duration_since(now)),
        },
        CacheValue::Sold => SeatCacheEntry {
            kind: LockKind::Sold,
            ttl_remaining: None,
        },
    }
}

/// An in-memory Durable Record Store seeded from a fixed seat list.
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<SeatId, SeatRecord>>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new(seats: Vec<Seat>) -> Self {
        let records = seats
            .into_iter()
            .map(|seat| {
                (
                    seat.seat_id.clone(),
                    SeatRecord {
                        seat,
                        status: SeatStatus::Available,
                        user_id: None,
                    },
                )
            })
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_seats(&self) -> BoxFuture<'_, Result<Vec<SeatRecord>>> {
        Box::pin(async move {
            Ok(self
                .records
                .lock()
                .expect("lock poisoned")
                .values()
                .cloned()
                .collect())
        })
    }

    fn get_seat<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<Option<SeatRecord>>> {
        Box::pin(async move {
            Ok(self
                .records
                .lock()
                .expect("lock poisoned")
                .get(seat_id)
                .cloned())
        })
    }

    fn book_seat<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
    ) -> BoxFuture<'a, Result<BookOutcome>> {
        Box::pin(async move {
            let mut records = self.records.lock().expect("lock poisoned");
            let record = records
                .get_mut(seat_id)
                .ok_or_else(|| ReservationError::Internal(format!("unknown seat {seat_id}")))?;
            if record.status == SeatStatus::Booked {
                return Ok(BookOutcome::AlreadyBooked);
            }
            record.status = SeatStatus::Booked;
            record.user_id = Some(user_id.clone());
            Ok(BookOutcome::Booked)
        })
    }

    fn reset_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            for record in self.records.lock().expect("lock poisoned").values_mut() {
                record.status = SeatStatus::Available;
                record.user_id = None;
            }
            Ok(())
        })
    }
}
