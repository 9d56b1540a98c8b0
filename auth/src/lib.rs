//! Password hashing and bearer-token issuance backing Seatguard's
//! registration/login surface (spec.md §2).
//!
//! This crate deliberately stays storage-agnostic: OTP issuance lives in
//! `seatguard-redis::otp`, user rows live in `seatguard-postgres::users`,
//! and `seatguard-web` composes all three at the handler layer.

pub mod error;
pub mod jwt;
pub mod password;

pub use error::{AuthError, Result};
pub use jwt::TokenIssuer;
