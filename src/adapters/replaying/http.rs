//! Replaying adapter for the `HttpTransport` port.

use std::sync::Mutex;

use tracing::debug;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::http::HttpRequest;
use crate::ports::http::{HttpFuture, HttpTransport};

/// Serves recorded responses in order, ignoring the live request contents.
pub struct ReplayingHttpTransport {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHttpTransport {
    /// Creates a replaying transport from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl HttpTransport for ReplayingHttpTransport {
    fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
        debug!(method = ?request.method, path = %request.path, "replaying request");
        let output = next_output(&self.replayer, "http", "send");
        Box::pin(async move { replay_result(output, "http::send") })
    }
}
