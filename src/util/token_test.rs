use super::*;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Build an unsigned JWT-shaped token with the given payload JSON.
fn token_with_payload(payload: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    format!("{header}.{body}.sig")
}

// =============================================================
// decode_claims
// =============================================================

#[test]
fn decode_claims_reads_exp() {
    let token = token_with_payload(r#"{"exp":1700000000,"sub":"42"}"#);
    let claims = decode_claims(&token).expect("claims");
    assert_eq!(claims.exp, 1_700_000_000);
}

#[test]
fn decode_claims_rejects_wrong_segment_count() {
    assert_eq!(decode_claims("only-one-segment"), Err(TokenError::Malformed));
    assert_eq!(decode_claims("a.b"), Err(TokenError::Malformed));
    assert_eq!(decode_claims("a.b.c.d"), Err(TokenError::Malformed));
}

#[test]
fn decode_claims_rejects_bad_base64() {
    assert!(matches!(
        decode_claims("head.!!not-base64!!.sig"),
        Err(TokenError::Base64(_))
    ));
}

#[test]
fn decode_claims_rejects_payload_without_exp() {
    let token = token_with_payload(r#"{"sub":"42"}"#);
    assert!(matches!(decode_claims(&token), Err(TokenError::Json(_))));
}

// =============================================================
// is_expired (fail-closed)
// =============================================================

#[test]
fn is_expired_false_for_future_expiry() {
    let token = token_with_payload(r#"{"exp":2000}"#);
    assert!(!is_expired(&token, 1000));
}

#[test]
fn is_expired_false_at_exact_expiry_instant() {
    let token = token_with_payload(r#"{"exp":1500}"#);
    assert!(!is_expired(&token, 1500));
}

#[test]
fn is_expired_true_for_past_expiry() {
    let token = token_with_payload(r#"{"exp":1000}"#);
    assert!(is_expired(&token, 2000));
}

#[test]
fn is_expired_true_for_garbage_token() {
    assert!(is_expired("not a token at all", 0));
    assert!(is_expired("", 0));
}
