//! HMAC-signed bearer tokens carrying a `user_id` claim (spec.md §6: every
//! authenticated endpoint takes `Authorization: Bearer <token>`).
//!
//! The teacher's sessions are server-side state looked up by session ID
//! (`auth/src/stores/session_redis.rs`); this crate verifies tokens locally
//! instead, which is why `seatguard-web`'s `AuthUser` extractor never
//! touches the Hot State Store. `jsonwebtoken` is the signing crate the
//! wider example pack reaches for when server-side session storage isn't
//! the chosen shape.

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use seatguard_core::UserId;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// Signs and verifies bearer tokens with a single shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: ChronoDuration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::hours(24)),
        }
    }

    /// Mint a bearer token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, user_id: &UserId) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.0.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify `token` and return the `user_id` it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` if the token's `exp` has passed,
    /// or `AuthError::TokenInvalid` for any other decoding failure.
    pub fn verify(&self, token: &str) -> Result<UserId> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            },
        )?;
        Ok(UserId::from(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_valid_token() {
        let issuer = TokenIssuer::new(b"test-secret", std::time::Duration::from_secs(3600));
        let token = issuer.issue(&UserId::from("u1")).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), UserId::from("u1"));
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let issuer_a = TokenIssuer::new(b"secret-a", std::time::Duration::from_secs(3600));
        let issuer_b = TokenIssuer::new(b"secret-b", std::time::Duration::from_secs(3600));
        let token = issuer_a.issue(&UserId::from("u1")).unwrap();
        assert_eq!(issuer_b.verify(&token).unwrap_err(), AuthError::TokenInvalid);
    }

    #[test]
    fn rejects_an_expired_token() {
        let issuer = TokenIssuer::new(b"test-secret", std::time::Duration::from_secs(0));
        let token = issuer.issue(&UserId::from("u1")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(issuer.verify(&token).unwrap_err(), AuthError::TokenExpired);
    }
}
