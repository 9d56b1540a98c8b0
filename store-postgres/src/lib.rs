//! Postgres-backed Durable Record Store (spec.md §2 item 2, §4.1) and the
//! user table backing registration/login.
//!
//! Grounded on the teacher's `postgres` crate (sqlx pool wrapper) and the
//! `sqlx::query_as(...).bind(...).fetch_*(pool.as_ref())` idiom from
//! `examples/ticketing/src/projections/available_seats_postgres.rs`; the
//! book-seat transaction below plays the same "check then write inside one
//! transaction" role as that projection's idempotency check plus insert.

pub mod seats;
pub mod users;

pub use seats::PostgresRecordStore;
pub use users::{PostgresUserStore, UserRecord};

/// Run the embedded migrations against `pool`.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
