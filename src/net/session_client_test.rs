use super::*;
use crate::net::types::DistanceUnit;
use serde_json::json;

fn user() -> User {
    User {
        id: 7,
        email: "golfer@example.com".to_owned(),
        first_name: "Eli".to_owned(),
        last_name: "Berg".to_owned(),
        sex: None,
        country: None,
        city: None,
        address: None,
        postal_code: None,
        timezone: Some("Europe/Oslo".to_owned()),
        distance_unit: DistanceUnit::Meters,
        is_admin: false,
    }
}

fn profile_input() -> ProfileUpdate {
    ProfileUpdate {
        first_name: "  Eli ".to_owned(),
        last_name: "Berg".to_owned(),
        sex: "M".to_owned(),
        country: String::new(),
        city: "  ".to_owned(),
        address: "Fairway 1".to_owned(),
        postal_code: String::new(),
        timezone: "Europe/Oslo".to_owned(),
        distance_unit: "meters".to_owned(),
    }
}

// =============================================================
// classify_me_response
// =============================================================

#[test]
fn me_response_with_user_is_update() {
    let resp = MeResponse {
        user: Some(user()),
        action_required: None,
        message: None,
    };
    match classify_me_response(resp) {
        MeDirective::Update(u) => assert_eq!(u.id, 7),
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn me_response_logout_directive_wins_over_user() {
    let resp = MeResponse {
        user: Some(user()),
        action_required: Some(ActionRequired::Logout),
        message: Some("Account deactivated".to_owned()),
    };
    assert_eq!(
        classify_me_response(resp),
        MeDirective::Logout {
            message: "Account deactivated".to_owned()
        }
    );
}

#[test]
fn me_response_token_refresh_directive() {
    let resp = MeResponse {
        user: None,
        action_required: Some(ActionRequired::TokenRefresh),
        message: Some("Permissions changed".to_owned()),
    };
    assert_eq!(classify_me_response(resp), MeDirective::TokenRefresh);
}

#[test]
fn me_response_without_user_or_directive_is_fail_safe_logout() {
    let resp = MeResponse::default();
    assert!(matches!(
        classify_me_response(resp),
        MeDirective::Logout { .. }
    ));
}

#[test]
fn me_response_action_required_deserializes_snake_case() {
    let resp: MeResponse =
        serde_json::from_value(json!({ "action_required": "token_refresh", "message": "m" }))
            .expect("me response");
    assert_eq!(resp.action_required, Some(ActionRequired::TokenRefresh));
}

// =============================================================
// prepare_profile_update
// =============================================================

#[test]
fn prepare_trims_and_strips_empty_fields() {
    let payload = prepare_profile_update(&profile_input()).expect("payload");
    assert_eq!(payload.first_name, "Eli");
    assert_eq!(payload.country, None);
    assert_eq!(payload.city, None);
    assert_eq!(payload.address.as_deref(), Some("Fairway 1"));
    assert_eq!(payload.distance_unit, DistanceUnit::Meters);
}

#[test]
fn prepare_rejects_empty_first_name() {
    let mut input = profile_input();
    input.first_name = "   ".to_owned();
    assert_eq!(
        prepare_profile_update(&input),
        Err("First name is required".to_owned())
    );
}

#[test]
fn prepare_rejects_empty_last_name() {
    let mut input = profile_input();
    input.last_name = String::new();
    assert_eq!(
        prepare_profile_update(&input),
        Err("Last name is required".to_owned())
    );
}

#[test]
fn prepare_defaults_unknown_distance_unit_to_yards() {
    let mut input = profile_input();
    input.distance_unit = "furlongs".to_owned();
    let payload = prepare_profile_update(&input).expect("payload");
    assert_eq!(payload.distance_unit, DistanceUnit::Yards);
}

#[test]
fn payload_serialization_skips_stripped_fields() {
    let payload = prepare_profile_update(&profile_input()).expect("payload");
    let value = serde_json::to_value(&payload).expect("json");
    assert!(value.get("country").is_none());
    assert_eq!(value["first_name"], "Eli");
    assert_eq!(value["distance_unit"], "meters");
}

// =============================================================
// profile_error_message composition
// =============================================================

#[test]
fn profile_error_joins_validation_details() {
    let err = ApiError::Status {
        status: 400,
        body: json!({
            "details": {
                "first_name": ["Too long"],
                "timezone": "Unknown timezone"
            }
        }),
    };
    let message = profile_error_message(&err);
    assert!(message.starts_with("Validation errors: "));
    assert!(message.contains("first_name: Too long"));
    assert!(message.contains("timezone: Unknown timezone"));
}

#[test]
fn profile_error_falls_back_to_error_then_message() {
    let err = ApiError::Status {
        status: 400,
        body: json!({ "error": "bad profile" }),
    };
    assert_eq!(profile_error_message(&err), "bad profile");

    let err = ApiError::Status {
        status: 400,
        body: json!({ "message": "try again" }),
    };
    assert_eq!(profile_error_message(&err), "try again");
}

#[test]
fn profile_error_generic_for_network_failure() {
    let err = ApiError::Network("timeout".to_owned());
    assert_eq!(profile_error_message(&err), "Profile update failed");
}

// =============================================================
// ApiError helpers
// =============================================================

#[test]
fn forbidden_status_is_detected() {
    let err = ApiError::Status {
        status: 403,
        body: json!({}),
    };
    assert!(err.is_forbidden());

    let err = ApiError::Status {
        status: 500,
        body: json!({}),
    };
    assert!(!err.is_forbidden());
}

#[test]
fn body_message_prefers_message_over_error() {
    let err = ApiError::Status {
        status: 401,
        body: json!({ "message": "m1", "error": "m2" }),
    };
    assert_eq!(err.body_message(), Some("m1"));

    let err = ApiError::Status {
        status: 401,
        body: json!({ "error": "m2" }),
    };
    assert_eq!(err.body_message(), Some("m2"));
}

/// Unsigned JWT-shaped token with the given expiry claim.
fn token_with_exp(exp: i64) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#).as_bytes());
    format!("{header}.{payload}.sig")
}

// =============================================================
// Applying /auth/me outcomes across login/logout boundaries
// =============================================================

#[tokio::test]
async fn stale_logout_directive_does_not_destroy_fresh_session() {
    let session = RwSignal::new(SessionState::default());
    session.update(|s| s.apply_login("tok-1".to_owned(), user()));
    let stale_epoch = session.get_untracked().epoch;

    // The session logs out and logs back in while the fetch is in
    // flight; the directive arrives two epochs late.
    session.update(SessionState::apply_logout);
    session.update(|s| s.apply_login("tok-2".to_owned(), user()));

    let resp = MeResponse {
        user: None,
        action_required: Some(ActionRequired::Logout),
        message: Some("Account deactivated".to_owned()),
    };
    let outcome = apply_me_response(session, stale_epoch, resp).await;

    assert_eq!(outcome, RefreshOutcome::Skipped);
    let state = session.get_untracked();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("tok-2"));
    assert!(state.user.is_some());
}

#[tokio::test]
async fn stale_token_refresh_directive_is_dropped() {
    let session = RwSignal::new(SessionState::default());
    session.update(|s| s.apply_login("tok-1".to_owned(), user()));
    let stale_epoch = session.get_untracked().epoch;
    session.update(SessionState::apply_logout);

    let resp = MeResponse {
        user: None,
        action_required: Some(ActionRequired::TokenRefresh),
        message: None,
    };
    let outcome = apply_me_response(session, stale_epoch, resp).await;

    assert_eq!(outcome, RefreshOutcome::Skipped);
    assert!(!session.get_untracked().is_authenticated);
}

#[tokio::test]
async fn logout_directive_under_current_epoch_ends_session_anonymous() {
    let session = RwSignal::new(SessionState::default());
    session.update(|s| s.apply_login("tok-1".to_owned(), user()));
    let epoch = session.get_untracked().epoch;

    let resp = MeResponse {
        user: None,
        action_required: Some(ActionRequired::Logout),
        message: Some("Account deactivated".to_owned()),
    };
    let outcome = apply_me_response(session, epoch, resp).await;

    assert_eq!(
        outcome,
        RefreshOutcome::LoggedOut {
            message: "Account deactivated".to_owned()
        }
    );
    let state = session.get_untracked();
    assert!(!state.is_authenticated);
    assert!(state.token.is_none());
    assert!(state.user.is_none());
}

#[tokio::test]
async fn fetched_user_populates_restored_session() {
    // Token restored from storage, no cached user.
    let session = RwSignal::new(SessionState::restore(Some("tok".to_owned()), None, true));
    let epoch = session.get_untracked().epoch;

    let resp = MeResponse {
        user: Some(user()),
        action_required: None,
        message: None,
    };
    let outcome = apply_me_response(session, epoch, resp).await;

    assert_eq!(outcome, RefreshOutcome::Updated);
    let state = session.get_untracked();
    assert!(state.is_logged_in());
    assert_eq!(state.user.as_ref().map(|u| u.id), Some(7));
}

// =============================================================
// classify_init
// =============================================================

#[test]
fn init_fetches_user_for_valid_token_without_user() {
    let state = SessionState::restore(Some(token_with_exp(2_000)), None, false);
    assert_eq!(classify_init(&state, 1_000), InitDirective::FetchUser);
}

#[test]
fn init_logs_out_expired_token() {
    let state = SessionState::restore(Some(token_with_exp(1_000)), Some(user()), true);
    assert_eq!(classify_init(&state, 2_000), InitDirective::Logout);
}

#[test]
fn init_skips_when_user_already_cached() {
    let state = SessionState::restore(Some(token_with_exp(2_000)), Some(user()), true);
    assert_eq!(classify_init(&state, 1_000), InitDirective::Skip);
}

#[test]
fn init_skips_without_token() {
    assert_eq!(classify_init(&SessionState::default(), 1_000), InitDirective::Skip);
}

// =============================================================
// Signal-level semantics
// =============================================================

#[test]
fn fail_records_message_without_touching_credentials() {
    let session = RwSignal::new(SessionState::restore(
        Some("tok".to_owned()),
        Some(user()),
        true,
    ));
    let err = ApiError::Status {
        status: 401,
        body: json!({ "message": "Invalid credentials" }),
    };

    let message = fail(session, &err, "Login failed");

    let state = session.get_untracked();
    assert_eq!(message, "Invalid credentials");
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert_eq!(state.token.as_deref(), Some("tok"));
    assert!(state.user.is_some());
}

#[test]
fn start_user_data_refresh_twice_keeps_one_loop() {
    let session = RwSignal::new(SessionState::restore(
        Some("tok".to_owned()),
        Some(user()),
        true,
    ));

    start_user_data_refresh(session);
    assert!(session.get_untracked().refresh_active);

    // Second start is a no-op while the loop is live.
    start_user_data_refresh(session);
    assert!(session.get_untracked().refresh_active);

    stop_user_data_refresh(session);
    assert!(!session.get_untracked().refresh_active);
}

// =============================================================
// User merge on profile update
// =============================================================

#[test]
fn merged_overwrites_only_patched_fields() {
    let base = user();
    let merged = base.merged(&json!({ "city": "Oslo", "distance_unit": "yards" }));
    assert_eq!(merged.city.as_deref(), Some("Oslo"));
    assert_eq!(merged.distance_unit, DistanceUnit::Yards);
    assert_eq!(merged.email, base.email);
    assert_eq!(merged.id, base.id);
}

#[test]
fn merged_ignores_undecodable_patch() {
    let base = user();
    let merged = base.merged(&json!({ "id": "not-a-number" }));
    assert_eq!(merged, base);
}
