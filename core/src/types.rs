//! Domain types shared by the reservation state machine and both stores.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable alphanumeric seat identifier, e.g. `"A1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub String);

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SeatId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SeatId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Stable user identifier.
///
/// Modeled as a string throughout per the open question in spec.md §9(b):
/// some legacy snapshot paths parsed this as numeric, which this
/// implementation standardizes away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Seat pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Vip,
    Premium,
    Standard,
}

/// Immutable seat metadata, loaded once at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: SeatId,
    pub row: String,
    pub number: u32,
    pub tier: Tier,
    /// Non-negative currency minor units (e.g. cents).
    pub price: u64,
}

/// Durable status of a seat, as recorded in the Durable Record Store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Booked,
}

/// A seat row as stored in the Durable Record Store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub seat: Seat,
    pub status: SeatStatus,
    pub user_id: Option<UserId>,
}

/// Outcome of `RecordStore::book_seat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    Booked,
    AlreadyBooked,
}

/// Outcome of `HotStateStore::hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    Acquired,
    Conflict,
}

/// The value carried by a `seat:{seat_id}` key in the Hot State Store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockKind {
    Locked(UserId),
    Sold,
}

/// A decoded `seat:{seat_id}` entry, with its remaining TTL if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCacheEntry {
    pub kind: LockKind,
    /// `None` for `Sold` (no TTL) and for a `Locked` entry whose remaining
    /// TTL could not be read.
    pub ttl_remaining: Option<Duration>,
}

impl SeatCacheEntry {
    #[must_use]
    pub fn is_locked_by(&self, user_id: &UserId) -> bool {
        matches!(&self.kind, LockKind::Locked(holder) if holder == user_id)
    }

    #[must_use]
    pub fn is_sold(&self) -> bool {
        matches!(self.kind, LockKind::Sold)
    }
}

/// The durable result of a successful purchase (spec.md §3 "Receipt").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub success: bool,
    pub tx_id: String,
    pub seat_id: SeatId,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
}

/// State of a seat as reported by `ReservationCore::snapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SeatViewState {
    Available,
    Locked { locked_by: UserId, ttl: u64 },
    Booked,
}

/// A single row of `ReservationCore::snapshot`'s eventually-consistent view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat_id: SeatId,
    pub row: String,
    pub number: u32,
    pub tier: Tier,
    pub price: u64,
    #[serde(flatten)]
    pub state: SeatViewState,
}
