//! Domain types and the reservation state machine for Seatguard: a
//! high-contention seat-reservation engine for a ticketed event with a
//! fixed, enumerable seat inventory.
//!
//! This crate is storage-agnostic. It defines the [`HotStateStore`] and
//! [`RecordStore`] traits that production adapters (`seatguard-redis`,
//! `seatguard-postgres`) and test fakes both implement, and
//! [`ReservationCore`], which coordinates them to enforce every invariant
//! in the reservation design.

pub mod error;
#[cfg(feature = "test-util")]
pub mod fakes;
pub mod reservation;
pub mod store;
pub mod types;

pub use error::{ReservationError, Result};
pub use reservation::ReservationCore;
pub use store::{BoxFuture, HotStateStore, RecordStore};
pub use types::{
    BookOutcome, HoldOutcome, LockKind, Receipt, Seat, SeatCacheEntry, SeatId, SeatRecord,
    SeatStatus, SeatView, SeatViewState, Tier, UserId,
};
