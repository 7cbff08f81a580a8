//! HTTP transport port for talking to the task backend.

use std::future::Future;
use std::pin::Pin;

use crate::http::{HttpError, HttpRequest, HttpResponse};

/// Boxed future type alias used by [`HttpTransport`] to keep the trait dyn-compatible.
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Sends requests to the backend and returns parsed responses.
///
/// Implementations resolve the request path against their base URL and
/// turn non-2xx statuses into [`HttpError::Status`].
pub trait HttpTransport: Send + Sync {
    /// Sends one request.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, undecodable bodies, and
    /// non-2xx responses.
    fn send(&self, request: HttpRequest) -> HttpFuture<'_>;
}
