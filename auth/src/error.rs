//! Error taxonomy for the auth supplement (spec.md §2: password + OTP
//! registration, bearer-token login), trimmed from the teacher's
//! magic-link/passkey/OAuth-shaped `AuthError` down to what this crate's
//! narrower surface needs.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Credentials
    // ═══════════════════════════════════════════════════════════
    /// Email/password pair did not match a registered user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email is already registered.
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    // ═══════════════════════════════════════════════════════════
    // One-time passwords
    // ═══════════════════════════════════════════════════════════
    /// The submitted OTP did not match the one issued for this email.
    #[error("Invalid or expired verification code")]
    InvalidOtp,

    // ═══════════════════════════════════════════════════════════
    // Bearer tokens
    // ═══════════════════════════════════════════════════════════
    /// Bearer token failed signature verification or decoding.
    #[error("Invalid bearer token")]
    TokenInvalid,

    /// Bearer token's `exp` claim has passed.
    #[error("Bearer token has expired")]
    TokenExpired,

    // ═══════════════════════════════════════════════════════════
    // Rate limiting
    // ═══════════════════════════════════════════════════════════
    /// Too many attempts against this IP or account; retry after the
    /// period resets.
    #[error("Too many attempts, retry after {retry_after_secs}s")]
    TooManyAttempts { retry_after_secs: u64 },

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════
    /// Wraps a lower-level failure (hashing, token signing, storage).
    #[error("Internal auth error: {0}")]
    Internal(String),
}
