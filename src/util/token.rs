//! Expiry inspection for the bearer token.
//!
//! The client holds no verification key, so it reads the JWT payload
//! segment without checking the signature; the server remains the
//! authority on token validity. Decoding is strict — every failure mode
//! has its own error — and the single lenient point is `is_expired`,
//! which maps any decode failure to "expired" (fail-closed).

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-segment JWT")]
    Malformed,
    #[error("token payload is not valid base64: {0}")]
    Base64(String),
    #[error("token payload is not valid JSON: {0}")]
    Json(String),
}

/// Claims the client cares about. Everything else in the payload is
/// ignored.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
}

/// Decode the payload segment of a JWT into [`Claims`].
///
/// # Errors
///
/// Returns a [`TokenError`] if the token does not have three
/// dot-separated segments, or the payload fails base64 or JSON decoding.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed);
    }
    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    serde_json::from_slice(&payload).map_err(|e| TokenError::Json(e.to_string()))
}

/// Whether the token's expiry claim lies strictly before `now_secs`.
///
/// Fail-closed: an undecodable token is reported as expired.
pub fn is_expired(token: &str, now_secs: i64) -> bool {
    decode_claims(token).map_or(true, |claims| claims.exp < now_secs)
}

/// Current Unix time in seconds.
pub fn now_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "hydrate"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        #[allow(clippy::cast_possible_wrap)]
        let secs = secs as i64;
        secs
    }
}
