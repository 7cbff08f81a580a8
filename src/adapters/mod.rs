//! Adapter implementations of the port traits.
//!
//! - `live`: real system clock and `reqwest` transport.
//! - `recording`: wraps another adapter and writes every call to a cassette.
//! - `replaying`: serves calls from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
