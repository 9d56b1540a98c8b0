//! One-time-password cache for registration (spec.md §2's auth
//! supplement). A 6-digit code is stored under `otp:{email}` with a 300s
//! TTL, the same `SET EX` / `GET` shape as the receipt cache in
//! `examples/ticketing/src/api/idempotency.rs`.

use rand::Rng;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use seatguard_core::{ReservationError, Result};

const OTP_TTL_SECS: u64 = 300;

fn otp_key(email: &str) -> String {
    format!("otp:{email}")
}

/// Redis-backed OTP cache.
#[derive(Clone)]
pub struct OtpStore {
    conn: ConnectionManager,
}

impl OtpStore {
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Generate and store a fresh 6-digit code for `email`, overwriting any
    /// still-pending code.
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is unreachable.
    pub async fn issue(&self, email: &str) -> Result<String> {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(otp_key(email), &code, OTP_TTL_SECS)
            .await
            .map_err(|e| ReservationError::Internal(format!("failed to store OTP: {e}")))?;
        Ok(code)
    }

    /// Check `candidate` against the stored code for `email`. On a match the
    /// code is consumed (deleted) so it cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is unreachable.
    pub async fn verify(&self, email: &str, candidate: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let key = otp_key(email);
        let stored: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| ReservationError::Internal(format!("failed to read OTP: {e}")))?;

        match stored {
            Some(stored) if stored == candidate => {
                let _: () = conn
                    .del(&key)
                    .await
                    .map_err(|e| ReservationError::Internal(format!("failed to consume OTP: {e}")))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
