//! Session lifecycle orchestration over the REST API.
//!
//! Free functions driving an `RwSignal<SessionState>`: login, register,
//! logout, current-user refresh, token refresh, profile update, and the
//! periodic user-data refresh loop. State changes go through the
//! transition methods on [`SessionState`]; this module owns the ordering
//! rules (stop the loop before logout, discard stale outcomes, fail-safe
//! logout on ambiguous refresh errors) and the persistence side effects.

#[cfg(test)]
#[path = "session_client_test.rs"]
mod session_client_test;

use leptos::prelude::{GetUntracked, RwSignal, Update};

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{
    ActionRequired, MeResponse, ProfilePayload, ProfileUpdate, RegisterData, User,
};
use crate::state::session::SessionState;
use crate::util::{storage, token};

/// Interval between background user-data refreshes.
pub const USER_REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

/// Outcome of a current-user refresh, as seen by callers such as the
/// refresh loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// User record replaced with the fetched one.
    Updated,
    /// Permissions changed; a new token was issued and the user
    /// re-fetched.
    TokenRefreshed,
    /// The session was ended, with a user-facing reason.
    LoggedOut { message: String },
    /// No token, or the outcome arrived under a stale epoch.
    Skipped,
}

/// Log in with credentials. On success the session becomes
/// authenticated, the token (and user, per strategy) is persisted, and
/// the refresh loop starts.
///
/// # Errors
///
/// Returns the user-facing failure message; token and user are left
/// untouched.
pub async fn login(
    session: RwSignal<SessionState>,
    email: &str,
    password: &str,
) -> Result<(), String> {
    session.update(|s| {
        s.loading = true;
        s.error = None;
    });
    let result = ApiClient::anonymous().login(email, password).await;
    match result {
        Ok(auth) => {
            session.update(|s| {
                s.apply_login(auth.access_token.clone(), auth.user.clone());
                s.loading = false;
            });
            persist(session);
            start_user_data_refresh(session);
            Ok(())
        }
        Err(err) => Err(fail(session, &err, "Login failed")),
    }
}

/// Register a new account. Same contract as [`login`] but the refresh
/// loop is not started.
///
/// # Errors
///
/// Returns the user-facing failure message; token and user are left
/// untouched.
pub async fn register(session: RwSignal<SessionState>, data: &RegisterData) -> Result<(), String> {
    session.update(|s| {
        s.loading = true;
        s.error = None;
    });
    let result = ApiClient::anonymous().register(data).await;
    match result {
        Ok(auth) => {
            session.update(|s| {
                s.apply_login(auth.access_token.clone(), auth.user.clone());
                s.loading = false;
            });
            persist(session);
            Ok(())
        }
        Err(err) => Err(fail(session, &err, "Registration failed")),
    }
}

/// End the session. The refresh loop is stopped first so no refresh
/// fires mid-logout; the server notification is best-effort and never
/// blocks local cleanup. Idempotent.
pub async fn logout(session: RwSignal<SessionState>) {
    stop_user_data_refresh(session);
    if let Some(token) = session.get_untracked().token {
        if let Err(err) = ApiClient::with_token(token).logout().await {
            leptos::logging::warn!("logout request failed: {err}");
        }
    }
    session.update(SessionState::apply_logout);
    storage::clear_session();
}

/// Re-fetch the current user, honouring server directives for account
/// deactivation (`logout`) and permission changes (`token_refresh`).
/// Any request failure ends the session: 403 with a revoked-access
/// message, everything else with a generic one (fail-safe).
pub async fn get_current_user(session: RwSignal<SessionState>) -> RefreshOutcome {
    let state = session.get_untracked();
    let Some(bearer) = state.token.clone() else {
        return RefreshOutcome::Skipped;
    };
    let epoch = state.epoch;

    match ApiClient::with_token(bearer).current_user().await {
        Ok(resp) => apply_me_response(session, epoch, resp).await,
        Err(err) => {
            if session.get_untracked().epoch != epoch {
                // A logout or re-login won the race; nothing to clean up.
                return RefreshOutcome::Skipped;
            }
            leptos::logging::warn!("current-user fetch failed: {err}");
            let message = if err.is_forbidden() {
                "Your access has been revoked"
            } else {
                "Authentication error"
            };
            end_session(session, message).await
        }
    }
}

/// Exchange the current token for a new one and re-fetch the user.
///
/// # Errors
///
/// Fails when no session is active, no new token was issued, or the
/// request failed.
pub async fn refresh_token(session: RwSignal<SessionState>) -> Result<(), String> {
    let state = session.get_untracked();
    let Some(bearer) = state.token.clone() else {
        return Err("no active session".to_owned());
    };
    let epoch = state.epoch;

    match ApiClient::with_token(bearer).refresh().await {
        Ok(resp) => {
            let Some(new_token) = resp.access_token else {
                return Err("no token issued".to_owned());
            };
            let mut applied = false;
            session.update(|s| applied = s.apply_token(epoch, new_token.clone()));
            if !applied {
                return Err("session ended during refresh".to_owned());
            }
            storage::write_token(&new_token);
            // Mutually recursive with get_current_user via the
            // token_refresh directive; boxing breaks the cycle.
            let _ = Box::pin(get_current_user(session)).await;
            Ok(())
        }
        Err(err) => {
            leptos::logging::warn!("token refresh failed: {err}");
            Err("Token refresh failed".to_owned())
        }
    }
}

/// Validate and submit a profile update, shallow-merging the returned
/// fields into the cached user on success.
///
/// # Errors
///
/// Returns a composed user-facing message; empty first or last name is
/// rejected locally without any API call.
pub async fn update_profile(
    session: RwSignal<SessionState>,
    input: &ProfileUpdate,
) -> Result<(), String> {
    let payload = match prepare_profile_update(input) {
        Ok(payload) => payload,
        Err(message) => {
            session.update(|s| s.error = Some(message.clone()));
            return Err(message);
        }
    };

    let state = session.get_untracked();
    let Some(bearer) = state.token.clone() else {
        return Err("no active session".to_owned());
    };
    session.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match ApiClient::with_token(bearer).update_profile(&payload).await {
        Ok(resp) if resp.success => {
            session.update(|s| {
                if let Some(user) = s.user.as_ref() {
                    s.user = Some(user.merged(&resp.data));
                }
                s.loading = false;
            });
            persist(session);
            Ok(())
        }
        Ok(_) => {
            session.update(|s| s.loading = false);
            Err("Profile update failed".to_owned())
        }
        Err(err) => {
            let message = profile_error_message(&err);
            session.update(|s| {
                s.loading = false;
                s.error = Some(message.clone());
            });
            Err(message)
        }
    }
}

/// Fire-and-forget password reset request with fixed outcome messages.
///
/// # Errors
///
/// Returns a fixed failure message when the request fails.
pub async fn request_password_reset(
    session: RwSignal<SessionState>,
    email: &str,
) -> Result<String, String> {
    session.update(|s| {
        s.loading = true;
        s.error = None;
    });
    let result = ApiClient::anonymous().request_password_reset(email).await;
    session.update(|s| s.loading = false);
    match result {
        Ok(()) => Ok("Password reset email sent".to_owned()),
        Err(err) => {
            let message = err
                .body_message()
                .unwrap_or("Failed to send reset email")
                .to_owned();
            session.update(|s| s.error = Some(message.clone()));
            Err(message)
        }
    }
}

/// Apply a parsed `/auth/me` response that was requested under `epoch`.
/// An outcome observed under a stale epoch — the session has crossed a
/// login/logout boundary since the request left — is dropped without
/// touching state, directives included.
async fn apply_me_response(
    session: RwSignal<SessionState>,
    epoch: u64,
    resp: MeResponse,
) -> RefreshOutcome {
    if session.get_untracked().epoch != epoch {
        return RefreshOutcome::Skipped;
    }
    match classify_me_response(resp) {
        MeDirective::Logout { message } => {
            leptos::logging::warn!("account deactivated, logging out");
            end_session(session, &message).await
        }
        MeDirective::TokenRefresh => {
            leptos::logging::log!("permissions changed, refreshing token");
            if refresh_token(session).await.is_ok() {
                RefreshOutcome::TokenRefreshed
            } else {
                end_session(session, "Session expired due to permission changes").await
            }
        }
        MeDirective::Update(user) => {
            let mut applied = false;
            session.update(|s| applied = s.apply_user(epoch, *user));
            if applied {
                persist(session);
                RefreshOutcome::Updated
            } else {
                RefreshOutcome::Skipped
            }
        }
    }
}

/// Idempotent bootstrap for a restored session: a token without a loaded
/// user triggers a current-user fetch, and an expired token logs out
/// immediately. Overlapping navigations run it once.
pub async fn initialize_auth(session: RwSignal<SessionState>) {
    let state = session.get_untracked();
    if state.token.is_none() || state.initializing {
        return;
    }
    session.update(|s| s.initializing = true);

    match classify_init(&state, token::now_secs()) {
        InitDirective::Logout => {
            leptos::logging::warn!("stored token is expired, logging out");
            logout(session).await;
        }
        InitDirective::FetchUser => {
            let _ = get_current_user(session).await;
        }
        InitDirective::Skip => {}
    }

    session.update(|s| s.initializing = false);
}

/// What `initialize_auth` should do for the given session snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InitDirective {
    /// Token expired; end the session.
    Logout,
    /// Valid token with no loaded user; fetch it.
    FetchUser,
    Skip,
}

fn classify_init(state: &SessionState, now_secs: i64) -> InitDirective {
    match state.token.as_deref() {
        None => InitDirective::Skip,
        Some(bearer) if token::is_expired(bearer, now_secs) => InitDirective::Logout,
        Some(_) if state.user.is_none() => InitDirective::FetchUser,
        Some(_) => InitDirective::Skip,
    }
}

/// Start the periodic user-data refresh loop. A no-op while a loop is
/// already active; the loop stops itself on logout or epoch change.
pub fn start_user_data_refresh(session: RwSignal<SessionState>) {
    let mut started = false;
    session.update(|s| started = s.try_begin_refresh());
    if !started {
        return;
    }
    let epoch = session.get_untracked().epoch;

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(refresh_loop(session, epoch));
    #[cfg(not(feature = "hydrate"))]
    let _ = epoch;
}

/// Stop the refresh loop; the running loop observes the cleared flag at
/// its next tick.
pub fn stop_user_data_refresh(session: RwSignal<SessionState>) {
    session.update(SessionState::end_refresh);
}

#[cfg(feature = "hydrate")]
async fn refresh_loop(session: RwSignal<SessionState>, epoch: u64) {
    loop {
        gloo_timers::future::sleep(USER_REFRESH_INTERVAL).await;

        let state = session.get_untracked();
        if !state.refresh_active || state.epoch != epoch {
            return;
        }
        if !state.is_authenticated {
            continue;
        }
        match get_current_user(session).await {
            RefreshOutcome::LoggedOut { .. } => {
                stop_user_data_refresh(session);
                return;
            }
            RefreshOutcome::TokenRefreshed => {
                leptos::logging::log!("your permissions have been updated");
            }
            RefreshOutcome::Updated | RefreshOutcome::Skipped => {}
        }
    }
}

/// Stop the loop, record the reason, clear the session.
async fn end_session(session: RwSignal<SessionState>, message: &str) -> RefreshOutcome {
    session.update(|s| s.error = Some(message.to_owned()));
    logout(session).await;
    RefreshOutcome::LoggedOut {
        message: message.to_owned(),
    }
}

/// Persist the session per the configured strategy.
fn persist(session: RwSignal<SessionState>) {
    let state = session.get_untracked();
    if let Some(token) = state.token.as_deref() {
        storage::write_token(token);
    }
    if state.persist_user {
        if let Some(user) = state.user.as_ref() {
            storage::write_user(user);
        }
    }
}

/// Record a failure message on the session and hand it to the caller.
fn fail(session: RwSignal<SessionState>, err: &ApiError, fallback: &str) -> String {
    let message = err.body_message().unwrap_or(fallback).to_owned();
    session.update(|s| {
        s.loading = false;
        s.error = Some(message.clone());
    });
    message
}

/// What a `/auth/me` response tells the client to do.
#[derive(Debug, PartialEq)]
enum MeDirective {
    Logout { message: String },
    TokenRefresh,
    Update(Box<User>),
}

/// Reduce a `/auth/me` response to a directive. A response carrying
/// neither a directive nor a user is treated as session-ending
/// (fail-safe).
fn classify_me_response(resp: MeResponse) -> MeDirective {
    match resp.action_required {
        Some(ActionRequired::Logout) => MeDirective::Logout {
            message: resp
                .message
                .unwrap_or_else(|| "Your account has been deactivated".to_owned()),
        },
        Some(ActionRequired::TokenRefresh) => MeDirective::TokenRefresh,
        None => match resp.user {
            Some(user) => MeDirective::Update(Box::new(user)),
            None => MeDirective::Logout {
                message: "Authentication error".to_owned(),
            },
        },
    }
}

/// Trim, validate, and normalise raw profile form input.
///
/// # Errors
///
/// Rejects an empty first or last name before any network traffic.
fn prepare_profile_update(input: &ProfileUpdate) -> Result<ProfilePayload, String> {
    let first_name = input.first_name.trim();
    if first_name.is_empty() {
        return Err("First name is required".to_owned());
    }
    let last_name = input.last_name.trim();
    if last_name.is_empty() {
        return Err("Last name is required".to_owned());
    }

    Ok(ProfilePayload {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        sex: non_empty(&input.sex),
        country: non_empty(&input.country),
        city: non_empty(&input.city),
        address: non_empty(&input.address),
        postal_code: non_empty(&input.postal_code),
        timezone: non_empty(&input.timezone),
        distance_unit: crate::net::types::DistanceUnit::normalize(&input.distance_unit),
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Compose a user-facing message for a failed profile update: joined
/// field-level validation details, else the body's `error`/`message`,
/// else a generic fallback.
fn profile_error_message(err: &ApiError) -> String {
    if let Some(details) = err.validation_details() {
        if let Some(fields) = details.as_object() {
            let joined = fields
                .iter()
                .map(|(field, errors)| match errors {
                    serde_json::Value::Array(items) => {
                        let msgs: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                        format!("{field}: {}", msgs.join(", "))
                    }
                    serde_json::Value::String(msg) => format!("{field}: {msg}"),
                    other => format!("{field}: {other}"),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return format!("Validation errors: {joined}");
        }
    }
    if let ApiError::Status { body, .. } = err {
        if let Some(msg) = body.get("error").and_then(serde_json::Value::as_str) {
            return msg.to_owned();
        }
        if let Some(msg) = body.get("message").and_then(serde_json::Value::as_str) {
            return msg.to_owned();
        }
    }
    "Profile update failed".to_owned()
}
