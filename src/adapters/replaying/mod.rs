//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod http;

pub use clock::ReplayingClock;
pub use http::ReplayingHttpTransport;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode an output written by `recording::record_result`.
///
/// # Panics
///
/// Panics when the output is not an `Ok`/`Err` object of the expected types.
pub(crate) fn replay_result<T, E>(output: serde_json::Value, context: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(ok) = output.get("Ok") {
        let value = serde_json::from_value(ok.clone())
            .unwrap_or_else(|e| panic!("{context}: failed to deserialize Ok value: {e}"));
        return Ok(value);
    }
    if let Some(err) = output.get("Err") {
        let error = serde_json::from_value(err.clone())
            .unwrap_or_else(|e| panic!("{context}: failed to deserialize Err value: {e}"));
        return Err(error);
    }
    panic!("{context}: recorded output is neither Ok nor Err: {output}");
}
