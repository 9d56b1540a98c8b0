//! User table backing registration/login. The teacher's auth crate keeps
//! users behind magic-link/passkey identities with no password column;
//! this table is new, sized for spec.md's password+OTP flow, following the
//! same `sqlx::query_as(...).bind(...).fetch_*` shape as `seats.rs`.

use seatguard_core::UserId;
use sqlx::PgPool;

/// A row of the `users` table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
}

/// Postgres-backed user store for the auth supplement.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user row.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Database` with a unique-violation kind if the
    /// email is already registered, or any other `sqlx::Error` if the
    /// database is unreachable.
    pub async fn create(
        &self,
        user_id: &UserId,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO users (user_id, email, password_hash, phone) VALUES ($1, $2, $3, $4)")
            .bind(user_id.0.as_str())
            .bind(email)
            .bind(password_hash)
            .bind(phone)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Look up a user by email, for login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row: Option<(String, String, String, Option<String>)> = sqlx::query_as(
            "SELECT user_id, email, password_hash, phone FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, email, password_hash, phone)| UserRecord {
            user_id: UserId::from(user_id),
            email,
            password_hash,
            phone,
        }))
    }
}
