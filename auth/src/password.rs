//! Argon2 password hashing. The teacher's auth crate has no password flow
//! to ground this on directly (it authenticates via magic link, passkey,
//! or OAuth); `argon2` is the hasher the wider example pack reaches for
//! whenever a password column shows up, so it's used here unchanged from
//! its usual idiom rather than hand-rolled.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{AuthError, Result};

/// Hash `password` with a fresh random salt.
///
/// # Errors
///
/// Returns an error if the underlying hasher fails.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("failed to hash password: {e}")))
}

/// Verify `password` against a previously stored `hash`.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match,
/// or `AuthError::Internal` if `hash` is malformed.
pub fn verify(password: &str, hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("stored hash is malformed: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_matching_password() {
        let hashed = hash("correct horse battery staple").unwrap();
        verify("correct horse battery staple", &hashed).unwrap();
    }

    #[test]
    fn rejects_a_wrong_password() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert_eq!(
            verify("wrong password", &hashed).unwrap_err(),
            AuthError::InvalidCredentials
        );
    }
}
