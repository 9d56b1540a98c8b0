//! The reservation state machine (spec.md §4.1).
//!
//! `ReservationCore` owns every invariant in spec.md §3. It performs no
//! in-process locking of its own: all coordination is delegated to the
//! `HotStateStore` (single-key atomic scripts) and `RecordStore`
//! (transactions with a unique constraint), per spec.md §5.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ReservationError, Result};
use crate::store::{HotStateStore, RecordStore};
use crate::types::{
    BookOutcome, HoldOutcome, LockKind, Receipt, SeatId, SeatViewState, SeatView, UserId,
};

/// Default hold duration (spec.md §4.1.1): 300 seconds.
pub const DEFAULT_HOLD_TTL: Duration = Duration::from_secs(300);

/// Default receipt retention (spec.md §3 "Receipt"): 24 hours.
pub const DEFAULT_RECEIPT_TTL: Duration = Duration::from_secs(86_400);

/// The reservation state machine, generic over no type parameters: it holds
/// its two collaborators behind trait objects so that production adapters
/// (Redis, Postgres) and test fakes are interchangeable at the composition
/// root.
#[derive(Clone)]
pub struct ReservationCore {
    hss: Arc<dyn HotStateStore>,
    drs: Arc<dyn RecordStore>,
    hold_ttl: Duration,
    receipt_ttl: Duration,
}

impl ReservationCore {
    #[must_use]
    pub fn new(hss: Arc<dyn HotStateStore>, drs: Arc<dyn RecordStore>) -> Self {
        Self {
            hss,
            drs,
            hold_ttl: DEFAULT_HOLD_TTL,
            receipt_ttl: DEFAULT_RECEIPT_TTL,
        }
    }

    #[must_use]
    pub fn with_ttls(mut self, hold_ttl: Duration, receipt_ttl: Duration) -> Self {
        self.hold_ttl = hold_ttl;
        self.receipt_ttl = receipt_ttl;
        self
    }

    /// `hold(seat_id, user_id) -> {acquired | conflict}` (spec.md §4.1.1).
    ///
    /// A client re-acquiring its own hold is itself a conflict: holds are
    /// not renewable via `hold`, only via `release` then `hold`.
    pub async fn hold(&self, seat_id: &SeatId, user_id: &UserId) -> Result<()> {
        match self.hss.hold(seat_id, user_id, self.hold_ttl).await? {
            HoldOutcome::Acquired => {
                tracing::info!(%seat_id, %user_id, "seat held");
                Ok(())
            }
            HoldOutcome::Conflict => {
                tracing::debug!(%seat_id, %user_id, "hold conflict");
                Err(ReservationError::Unavailable)
            }
        }
    }

    /// `release(seat_id, user_id) -> ok` (spec.md §4.1.2).
    ///
    /// Idempotent and permissive: a missing or foreign lock is not an
    /// error. Only a store-level transport failure propagates.
    pub async fn release(&self, seat_id: &SeatId, user_id: &UserId) -> Result<()> {
        self.hss.release(seat_id, user_id).await?;
        tracing::debug!(%seat_id, %user_id, "release requested");
        Ok(())
    }

    /// `purchase(idempotency_key, seat_id, user_id) -> receipt | failure`
    /// (spec.md §4.1.3).
    pub async fn purchase(
        &self,
        idempotency_key: &str,
        seat_id: &SeatId,
        user_id: &UserId,
    ) -> Result<Receipt> {
        // 1. Idempotency short-circuit.
        if let Some(receipt) = self.hss.get_receipt(idempotency_key).await? {
            tracing::info!(%seat_id, %user_id, idempotency_key, "idempotent replay");
            return Ok(receipt);
        }

        // 2. Hold verification.
        let holds = match self.hss.get_lock(seat_id).await? {
            Some(entry) => entry.is_locked_by(user_id),
            None => false,
        };
        if !holds {
            tracing::debug!(%seat_id, %user_id, "purchase without active hold");
            return Err(ReservationError::LockExpiredOrStolen);
        }

        // 3-4. Durable transaction: book the seat, aborting if already sold.
        match self.drs.book_seat(seat_id, user_id).await? {
            BookOutcome::AlreadyBooked => {
                tracing::error!(%seat_id, %user_id, "seat already sold with no receipt on record");
                return Err(ReservationError::AlreadySold);
            }
            BookOutcome::Booked => {}
        }

        // 5. Finalize HSS: SOLD, no TTL, overwriting the prior LOCKED entry.
        self.hss.mark_sold(seat_id).await?;

        // 6. Publish receipt.
        let receipt = Receipt {
            success: true,
            tx_id: format!("tx_{}", Uuid::new_v4().simple()),
            seat_id: seat_id.clone(),
            user_id: user_id.clone(),
            issued_at: Utc::now(),
        };
        self.hss
            .put_receipt(idempotency_key, &receipt, self.receipt_ttl)
            .await?;

        tracing::info!(%seat_id, %user_id, tx_id = %receipt.tx_id, "purchase complete");

        // 7. Return receipt.
        Ok(receipt)
    }

    /// `snapshot() -> [SeatView]` (spec.md §4.1.4).
    ///
    /// Not serializable against concurrent holds/purchases: DRS wins over
    /// HSS, `SOLD` wins over `LOCKED`, and an absent key means available.
    /// If the HSS scan fails, the snapshot degrades to "DRS only"
    /// (spec.md §7, "benign HSS errors on ... snapshot overlay").
    pub async fn snapshot(&self) -> Result<Vec<SeatView>> {
        let records = self.drs.list_seats().await?;

        let locks: HashMap<SeatId, crate::types::SeatCacheEntry> = match self.hss.scan_locks().await {
            Ok(entries) => entries.into_iter().collect(),
            Err(err) => {
                tracing::warn!(error = %err, "HSS scan failed, snapshot degrading to DRS only");
                HashMap::new()
            }
        };

        let views = records
            .into_iter()
            .map(|record| {
                let state = if record.status == crate::types::SeatStatus::Booked {
                    SeatViewState::Booked
                } else {
                    match locks.get(&record.seat.seat_id) {
                        Some(entry) if entry.is_sold() => SeatViewState::Booked,
                        Some(entry) => match &entry.kind {
                            LockKind::Locked(holder) => SeatViewState::Locked {
                                locked_by: holder.clone(),
                                ttl: entry
                                    .ttl_remaining
                                    .map_or(0, |d| d.as_secs()),
                            },
                            LockKind::Sold => unreachable!("handled above"),
                        },
                        None => SeatViewState::Available,
                    }
                };

                SeatView {
                    seat_id: record.seat.seat_id,
                    row: record.seat.row,
                    number: record.seat.number,
                    tier: record.seat.tier,
                    price: record.seat.price,
                    state,
                }
            })
            .collect();

        Ok(views)
    }

    /// `reset()` (spec.md §4.4): clears the HSS entirely and resets every
    /// DRS seat record to `available`.
    pub async fn reset(&self) -> Result<()> {
        self.hss.clear_all().await?;
        self.drs.reset_all().await?;
        tracing::warn!("reservation state reset");
        Ok(())
    }
}

#[cfg(all(test, feature = "test-util"))]
mod tests {
    use super::*;
    use crate::fakes::{InMemoryHotStateStore, InMemoryRecordStore};
    use crate::types::Seat;
    use std::sync::Arc;

    fn core_with_seat(seat_id: &str) -> ReservationCore {
        let seats = vec![Seat {
            seat_id: SeatId::from(seat_id),
            row: "A".into(),
            number: 1,
            tier: crate::types::Tier::Standard,
            price: 5_000,
        }];
        ReservationCore::new(
            Arc::new(InMemoryHotStateStore::new()),
            Arc::new(InMemoryRecordStore::new(seats)),
        )
    }

    // P1: at most one concurrent `hold` call wins.
    #[tokio::test]
    async fn single_winner_under_contention() {
        let core = core_with_seat("A1");
        let seat_id = SeatId::from("A1");

        let mut handles = Vec::new();
        for i in 0..500 {
            let core = core.clone();
            let seat_id = seat_id.clone();
            handles.push(tokio::spawn(async move {
                core.hold(&seat_id, &UserId::from(format!("u{i}"))).await
            }));
        }

        let mut acquired = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(()) => acquired += 1,
                Err(ReservationError::Unavailable) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(acquired, 1);
        assert_eq!(conflicts, 499);
    }

    // Scenario 2: hold -> pay happy path.
    #[tokio::test]
    async fn hold_then_pay_happy_path() {
        let core = core_with_seat("C3");
        let seat_id = SeatId::from("C3");
        let user = UserId::from("42");

        core.hold(&seat_id, &user).await.unwrap();
        let receipt = core.purchase("k", &seat_id, &user).await.unwrap();
        assert!(receipt.success);
        assert!(receipt.tx_id.starts_with("tx_"));

        let views = core.snapshot().await.unwrap();
        let view = views.iter().find(|v| v.seat_id == seat_id).unwrap();
        assert_eq!(view.state, SeatViewState::Booked);
    }

    // P3 / scenario 3: retry with the same idempotency key is a no-op.
    #[tokio::test]
    async fn retry_is_idempotent() {
        let core = core_with_seat("C3");
        let seat_id = SeatId::from("C3");
        let user = UserId::from("42");

        core.hold(&seat_id, &user).await.unwrap();
        let first = core.purchase("k", &seat_id, &user).await.unwrap();
        let second = core.purchase("k", &seat_id, &user).await.unwrap();
        assert_eq!(first, second);
    }

    // P5 / scenario 4: a purchase by a non-holder is rejected; the lock
    // stays with the original holder.
    #[tokio::test]
    async fn stolen_lock_rejected() {
        let core = core_with_seat("D4");
        let seat_id = SeatId::from("D4");
        let holder = UserId::from("42");
        let attacker = UserId::from("99");

        core.hold(&seat_id, &holder).await.unwrap();
        let result = core.purchase("k99", &seat_id, &attacker).await;
        assert_eq!(result, Err(ReservationError::LockExpiredOrStolen));

        let views = core.snapshot().await.unwrap();
        let view = views.iter().find(|v| v.seat_id == seat_id).unwrap();
        match &view.state {
            SeatViewState::Locked { locked_by, .. } => assert_eq!(locked_by, &holder),
            other => panic!("expected still locked, got {other:?}"),
        }
    }

    // P4 / scenario 5: an abandoned hold is reclaimable after its TTL.
    #[tokio::test(start_paused = true)]
    async fn expiry_frees_the_seat() {
        let core = core_with_seat("E5").with_ttls(Duration::from_secs(300), DEFAULT_RECEIPT_TTL);
        let seat_id = SeatId::from("E5");

        core.hold(&seat_id, &UserId::from("7")).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;

        core.hold(&seat_id, &UserId::from("8")).await.unwrap();
    }

    // P6 / scenario 6: release is permissive and idempotent.
    #[tokio::test]
    async fn release_is_permissive_and_idempotent() {
        let core = core_with_seat("F6");
        let seat_id = SeatId::from("F6");
        let holder = UserId::from("3");
        let stranger = UserId::from("4");

        core.hold(&seat_id, &holder).await.unwrap();

        // A foreign release is a no-op.
        core.release(&seat_id, &stranger).await.unwrap();
        let views = core.snapshot().await.unwrap();
        let view = views.iter().find(|v| v.seat_id == seat_id).unwrap();
        assert!(matches!(view.state, SeatViewState::Locked { .. }));

        // The real holder's release (called twice) frees the seat exactly once.
        core.release(&seat_id, &holder).await.unwrap();
        core.release(&seat_id, &holder).await.unwrap();
        let views = core.snapshot().await.unwrap();
        let view = views.iter().find(|v| v.seat_id == seat_id).unwrap();
        assert_eq!(view.state, SeatViewState::Available);
    }

    // P7: snapshot never reports `available` while DRS says booked.
    #[tokio::test]
    async fn snapshot_prefers_drs_booked_over_hss() {
        let core = core_with_seat("G7");
        let seat_id = SeatId::from("G7");
        let user = UserId::from("1");

        core.hold(&seat_id, &user).await.unwrap();
        core.purchase("k", &seat_id, &user).await.unwrap();

        let views = core.snapshot().await.unwrap();
        let view = views.iter().find(|v| v.seat_id == seat_id).unwrap();
        assert_eq!(view.state, SeatViewState::Booked);
    }

    #[tokio::test]
    async fn purchase_without_any_hold_is_rejected() {
        let core = core_with_seat("H8");
        let seat_id = SeatId::from("H8");
        let result = core
            .purchase("k", &seat_id, &UserId::from("1"))
            .await;
        assert_eq!(result, Err(ReservationError::LockExpiredOrStolen));
    }

    #[tokio::test]
    async fn reacquiring_own_hold_is_a_conflict() {
        let core = core_with_seat("I9");
        let seat_id = SeatId::from("I9");
        let user = UserId::from("1");
        core.hold(&seat_id, &user).await.unwrap();
        let result = core.hold(&seat_id, &user).await;
        assert_eq!(result, Err(ReservationError::Unavailable));
    }
}
