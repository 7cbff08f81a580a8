//! Transport-neutral HTTP request, response and error types.
//!
//! These are what the [`HttpTransport`](crate::ports::HttpTransport) port
//! speaks. They serialize cleanly so that cassettes can record and replay
//! whole exchanges.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path starting with `/`.
    pub path: String,
    /// Query parameters, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
    /// JSON body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), params: Vec::new(), body: None }
    }

    /// Builds a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Builds a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Builds a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Builds a `PATCH` request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// Builds a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body cannot be serialized.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        let value = serde_json::to_value(body)
            .map_err(|e| HttpError::Decode { message: format!("invalid request body: {e}") })?;
        self.body = Some(value);
        Ok(self)
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Parsed JSON body. `None` when the response was not JSON.
    #[serde(default)]
    pub data: Option<Value>,
}

impl HttpResponse {
    /// Decodes the body into `T`. A missing body decodes to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<Option<T>, HttpError> {
        self.data
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| HttpError::Decode { message: e.to_string() })
    }
}

/// Errors raised by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HttpError {
    /// The server answered with a non-2xx status.
    #[error("{status} {status_text}")]
    Status {
        /// Status code.
        status: u16,
        /// Canonical reason phrase.
        status_text: String,
        /// Parsed JSON error body, when the server sent one.
        #[serde(default)]
        payload: Option<Value>,
    },
    /// The request never produced a response.
    #[error("request failed: {message}")]
    Transport {
        /// Underlying transport message.
        message: String,
    },
    /// A body could not be encoded or decoded.
    #[error("invalid response body: {message}")]
    Decode {
        /// Underlying serde message.
        message: String,
    },
}

impl HttpError {
    /// Status code for [`HttpError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Parsed error body for [`HttpError::Status`], if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Status { payload, .. } => payload.as_ref(),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_displays_code_and_reason() {
        let err = HttpError::Status {
            status: 404,
            status_text: "Not Found".into(),
            payload: Some(json!({"message": "no such task"})),
        };
        assert_eq!(err.to_string(), "404 Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.payload(), Some(&json!({"message": "no such task"})));
    }

    #[test]
    fn missing_body_decodes_to_none() {
        let response = HttpResponse { status: 204, data: None };
        let decoded: Option<Vec<u32>> = response.json().unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn mismatched_body_is_a_decode_error() {
        let response = HttpResponse { status: 200, data: Some(json!({"not": "a list"})) };
        let err = response.json::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, HttpError::Decode { .. }));
    }

    #[test]
    fn request_serializes_compactly() {
        let request = HttpRequest::get("/developers").with_param("skill", "1,2");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"method": "GET", "path": "/developers", "params": [["skill", "1,2"]]}));
    }

    #[test]
    fn error_survives_cassette_encoding() {
        let err = HttpError::Transport { message: "connection refused".into() };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "transport");
        let back: HttpError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }
}
