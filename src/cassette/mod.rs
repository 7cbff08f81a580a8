//! Cassettes: YAML recordings of port interactions for deterministic replay.
//!
//! A cassette is an ordered list of `(port, method, input, output)`
//! interactions. Recording adapters append to one; replaying adapters
//! serve from one, keeping an independent cursor per port/method pair.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
