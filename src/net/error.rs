//! API error taxonomy.
//!
//! Transport failures, non-2xx statuses, and body-decode failures are
//! kept distinct so the session client can tell an authorization denial
//! (403, session-ending) from a flaky network, and so validation detail
//! payloads survive long enough to be composed into a user message.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(String),

    /// The server answered with a non-2xx status. The parsed body (or
    /// `Null` when unparsable) is retained for message extraction.
    #[error("server returned status {status}")]
    Status { status: u16, body: Value },

    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this is an authorization denial (HTTP 403).
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Status { status: 403, .. })
    }

    /// Human-readable message from the error body, preferring the
    /// `message` field over `error`.
    pub fn body_message(&self) -> Option<&str> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        body.get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
    }

    /// Field-level validation details from the error body, if present.
    pub fn validation_details(&self) -> Option<&Value> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        body.get("details").filter(|d| d.is_object())
    }
}
