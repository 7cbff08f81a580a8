//! Recording adapter for the `HttpTransport` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::http::HttpRequest;
use crate::ports::http::{HttpFuture, HttpTransport};

/// Records every exchange while delegating to an inner transport.
pub struct RecordingHttpTransport {
    inner: Box<dyn HttpTransport>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpTransport {
    /// Creates a recording transport wrapping the given implementation.
    pub fn new(inner: Box<dyn HttpTransport>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl HttpTransport for RecordingHttpTransport {
    fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
        Box::pin(async move {
            let result = self.inner.send(request.clone()).await;
            record_result(&self.recorder, "http", "send", &request, &result);
            result
        })
    }
}
