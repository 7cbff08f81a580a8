//! Live adapters that talk to the real clock and backend.

pub mod clock;
pub mod http;

pub use clock::LiveClock;
pub use http::LiveHttpTransport;
