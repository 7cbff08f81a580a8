//! Port traits defining external boundaries.
//!
//! Each trait is one boundary between the client core and the outside
//! world: wall-clock time (cache staleness) and the HTTP backend.
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod http;

pub use clock::Clock;
pub use http::{HttpFuture, HttpTransport};
