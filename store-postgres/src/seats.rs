//! `PostgresRecordStore`: the Durable Record Store.

use std::sync::Arc;

use seatguard_core::{
    BookOutcome, BoxFuture, RecordStore, ReservationError, Result, Seat, SeatId, SeatRecord,
    SeatStatus, Tier, UserId,
};
use sqlx::PgPool;

fn pg_err(context: &str, err: sqlx::Error) -> ReservationError {
    ReservationError::Internal(format!("{context}: {err}"))
}

fn tier_to_str(tier: Tier) -> &'static str {
    match tier {
        Tier::Vip => "vip",
        Tier::Premium => "premium",
        Tier::Standard => "standard",
    }
}

fn tier_from_str(value: &str) -> Result<Tier> {
    match value {
        "vip" => Ok(Tier::Vip),
        "premium" => Ok(Tier::Premium),
        "standard" => Ok(Tier::Standard),
        other => Err(ReservationError::Internal(format!("unknown tier {other}"))),
    }
}

type SeatRow = (String, String, i32, String, i64, String, Option<String>);

fn row_into_record(row: SeatRow) -> Result<SeatRecord> {
    let (seat_id, row_label, seat_number, tier, price, status, user_id) = row;
    Ok(SeatRecord {
        seat: Seat {
            seat_id: SeatId::from(seat_id),
            row: row_label,
            number: seat_number as u32,
            tier: tier_from_str(&tier)?,
            price: price as u64,
        },
        status: if status == "booked" {
            SeatStatus::Booked
        } else {
            SeatStatus::Available
        },
        user_id: user_id.map(UserId::from),
    })
}

/// Postgres-backed implementation of [`RecordStore`].
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: Arc<PgPool>,
}

impl PostgresRecordStore {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Insert the fixed seat inventory if the table is empty (boot-time
    /// seeding, spec.md §2's supplemented ambient concern).
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable.
    pub async fn seed_if_empty(&self, seats: &[Seat]) -> Result<()> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seats")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| pg_err("failed to count seats", e))?;

        if count > 0 {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| pg_err("failed to start seed transaction", e))?;
        for seat in seats {
            sqlx::query(
                "INSERT INTO seats (seat_id, row_label, seat_number, tier, price, status)
                 VALUES ($1, $2, $3, $4, $5, 'available')",
            )
            .bind(seat.seat_id.0.as_str())
            .bind(&seat.row)
            .bind(seat.number as i32)
            .bind(tier_to_str(seat.tier))
            .bind(seat.price as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| pg_err("failed to seed seat", e))?;
        }
        tx.commit()
            .await
            .map_err(|e| pg_err("failed to commit seed transaction", e))?;
        Ok(())
    }
}

impl RecordStore for PostgresRecordStore {
    fn list_seats(&self) -> BoxFuture<'_, Result<Vec<SeatRecord>>> {
        Box::pin(async move {
            let rows: Vec<SeatRow> = sqlx::query_as(
                "SELECT seat_id, row_label, seat_number, tier, price, status, user_id
                 FROM seats ORDER BY row_label, seat_number",
            )
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(|e| pg_err("failed to list seats", e))?;

            rows.into_iter().map(row_into_record).collect()
        })
    }

    fn get_seat<'a>(&'a self, seat_id: &'a SeatId) -> BoxFuture<'a, Result<Option<SeatRecord>>> {
        Box::pin(async move {
            let row: Option<SeatRow> = sqlx::query_as(
                "SELECT seat_id, row_label, seat_number, tier, price, status, user_id
                 FROM seats WHERE seat_id = $1",
            )
            .bind(seat_id.0.as_str())
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| pg_err("failed to fetch seat", e))?;

            row.map(row_into_record).transpose()
        })
    }

    fn book_seat<'a>(
        &'a self,
        seat_id: &'a SeatId,
        user_id: &'a UserId,
    ) -> BoxFuture<'a, Result<BookOutcome>> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| pg_err("failed to start booking transaction", e))?;

            let current_status: Option<(String,)> =
                sqlx::query_as("SELECT status FROM seats WHERE seat_id = $1 FOR UPDATE")
                    .bind(seat_id.0.as_str())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| pg_err("failed to lock seat row", e))?;

            let Some((status,)) = current_status else {
                return Err(ReservationError::Internal(format!(
                    "unknown seat {seat_id}"
                )));
            };

            if status == "booked" {
                tx.rollback()
                    .await
                    .map_err(|e| pg_err("failed to roll back booking transaction", e))?;
                return Ok(BookOutcome::AlreadyBooked);
            }

            sqlx::query("UPDATE seats SET status = 'booked', user_id = $2 WHERE seat_id = $1")
                .bind(seat_id.0.as_str())
                .bind(user_id.0.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| pg_err("failed to book seat", e))?;

            tx.commit()
                .await
                .map_err(|e| pg_err("failed to commit booking transaction", e))?;
            Ok(BookOutcome::Booked)
        })
    }

    fn reset_all(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            sqlx::query("UPDATE seats SET status = 'available', user_id = NULL")
                .execute(self.pool.as_ref())
                .await
                .map_err(|e| pg_err("failed to reset seats", e))?;
            Ok(())
        })
    }
}
