//! Error taxonomy for the reservation state machine (spec.md §7).

use thiserror::Error;

/// Errors surfaced by [`crate::reservation::ReservationCore`].
///
/// These are store-agnostic domain errors. The web layer maps each variant
/// to the HTTP status codes listed in spec.md §7.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// The seat is currently `LOCKED` by another user or already `SOLD`.
    #[error("seat is unavailable")]
    Unavailable,

    /// A purchase was attempted without an active hold owned by the caller.
    #[error("hold expired or was stolen")]
    LockExpiredOrStolen,

    /// The Durable Record Store shows `booked` but no receipt exists for
    /// this idempotency key. Indicates a prior successful purchase whose
    /// receipt was not preserved; an operator alert, not a client bug.
    #[error("seat already sold")]
    AlreadySold,

    /// Transport or store failure. Never exposes store internals to callers.
    #[error("internal store failure: {0}")]
    Internal(String),
}

/// Result alias used throughout `seatguard-core`.
pub type Result<T> = std::result::Result<T, ReservationError>;
