use super::*;
use crate::net::types::DistanceUnit;

fn user(id: i64, is_admin: bool) -> User {
    User {
        id,
        email: format!("golfer{id}@example.com"),
        first_name: "Eli".to_owned(),
        last_name: "Berg".to_owned(),
        sex: None,
        country: None,
        city: None,
        address: None,
        postal_code: None,
        timezone: Some("Europe/Oslo".to_owned()),
        distance_unit: DistanceUnit::Meters,
        is_admin,
    }
}

fn authenticated() -> SessionState {
    let mut state = SessionState::default();
    state.apply_login("tok-1".to_owned(), user(1, false));
    state
}

// =============================================================
// Defaults and restore
// =============================================================

#[test]
fn default_state_is_anonymous() {
    let state = SessionState::default();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.is_logged_in());
}

#[test]
fn restore_with_token_is_authenticated() {
    let state = SessionState::restore(Some("tok".to_owned()), None, true);
    assert!(state.is_authenticated);
    assert!(!state.is_logged_in());
}

#[test]
fn restore_with_token_and_user_is_logged_in() {
    let state = SessionState::restore(Some("tok".to_owned()), Some(user(1, false)), true);
    assert!(state.is_logged_in());
}

#[test]
fn restore_without_token_drops_stale_user() {
    let state = SessionState::restore(None, Some(user(1, false)), true);
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
}

// =============================================================
// Invariant: is_authenticated implies token present
// =============================================================

#[test]
fn authenticated_always_holds_token() {
    for state in [
        SessionState::default(),
        SessionState::restore(Some("tok".to_owned()), None, false),
        authenticated(),
        {
            let mut s = authenticated();
            s.apply_logout();
            s
        },
    ] {
        if state.is_authenticated {
            assert!(state.token.is_some());
        }
    }
}

// =============================================================
// Login / logout transitions
// =============================================================

#[test]
fn apply_login_sets_logged_in_and_bumps_epoch() {
    let mut state = SessionState::default();
    state.apply_login("tok-1".to_owned(), user(1, false));
    assert!(state.is_logged_in());
    assert_eq!(state.token.as_deref(), Some("tok-1"));
    assert_eq!(state.epoch, 1);
}

#[test]
fn apply_logout_clears_everything() {
    let mut state = authenticated();
    state.refresh_active = true;
    state.apply_logout();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.refresh_active);
}

#[test]
fn apply_logout_is_idempotent() {
    let mut state = authenticated();
    state.apply_logout();
    let after_first = SessionState {
        epoch: state.epoch + 1,
        ..state.clone()
    };
    state.apply_logout();
    assert_eq!(state, after_first);
}

// =============================================================
// Stale-epoch outcomes are discarded
// =============================================================

#[test]
fn apply_user_under_current_epoch_updates() {
    let mut state = authenticated();
    let epoch = state.epoch;
    assert!(state.apply_user(epoch, user(1, true)));
    assert!(state.user.as_ref().is_some_and(|u| u.is_admin));
}

#[test]
fn apply_user_after_logout_does_not_reauthenticate() {
    let mut state = authenticated();
    let epoch = state.epoch;
    state.apply_logout();
    assert!(!state.apply_user(epoch, user(1, false)));
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
}

#[test]
fn apply_token_after_logout_is_discarded() {
    let mut state = authenticated();
    let epoch = state.epoch;
    state.apply_logout();
    assert!(!state.apply_token(epoch, "tok-2".to_owned()));
    assert!(state.token.is_none());
}

#[test]
fn apply_token_under_current_epoch_swaps_token() {
    let mut state = authenticated();
    let epoch = state.epoch;
    assert!(state.apply_token(epoch, "tok-2".to_owned()));
    assert_eq!(state.token.as_deref(), Some("tok-2"));
}

// =============================================================
// Refresh loop handle
// =============================================================

#[test]
fn try_begin_refresh_second_call_is_noop() {
    let mut state = authenticated();
    assert!(state.try_begin_refresh());
    assert!(!state.try_begin_refresh());
    assert!(state.refresh_active);
}

#[test]
fn end_refresh_allows_restart() {
    let mut state = authenticated();
    assert!(state.try_begin_refresh());
    state.end_refresh();
    assert!(state.try_begin_refresh());
}
