//! HTTP surface for the Seatguard high-contention seat-reservation engine
//! (spec.md §6), in the teacher's `web`/`server` split: this crate owns
//! routing, extractors, middleware and error mapping; `seatguard-core`
//! owns the domain; `seatguard-redis`/`seatguard-postgres` own storage.

pub mod adapters;
pub mod config;
pub mod error;
pub mod extractors;
#[cfg(feature = "test-util")]
pub mod fakes;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
