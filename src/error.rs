//! Turning errors into messages fit for a banner.

use std::fmt::Display;

/// Renders `error` as a human-readable message.
///
/// Errors that render to nothing but whitespace are replaced by `fallback`,
/// so the caller always has something to show.
#[must_use]
pub fn normalize_error(error: &dyn Display, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
