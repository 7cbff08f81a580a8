//! Live adapter for the `HttpTransport` port using `reqwest`.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{HttpError, HttpRequest, HttpResponse, Method};
use crate::ports::http::{HttpFuture, HttpTransport};

/// Sends requests to the real backend at a fixed base URL.
pub struct LiveHttpTransport {
    client: Client,
    base_url: String,
}

impl LiveHttpTransport {
    /// Creates a transport rooted at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into() }
    }

    /// Resolves the request path and query parameters against the base URL.
    fn build_url(&self, request: &HttpRequest) -> Result<Url, HttpError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path)).map_err(|e| {
            HttpError::Transport { message: format!("invalid URL for {}: {e}", request.path) }
        })?;
        if !request.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

impl HttpTransport for LiveHttpTransport {
    fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
        Box::pin(async move {
            let url = self.build_url(&request)?;
            debug!(method = ?request.method, %url, "sending request");

            let mut builder = self.client.request(request.method.into(), url);
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| HttpError::Transport { message: e.to_string() })?;

            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.contains("application/json"));

            let data = if is_json {
                match response.json::<Value>().await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!(path = %request.path, error = %e, "failed to parse JSON response");
                        None
                    }
                }
            } else {
                None
            };

            if !status.is_success() {
                return Err(HttpError::Status {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                    payload: data,
                });
            }

            Ok(HttpResponse { status: status.as_u16(), data })
        })
    }
}
