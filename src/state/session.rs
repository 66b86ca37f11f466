#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// Client-held authentication state for the current user.
///
/// Lives in an `RwSignal<SessionState>` provided via context from the
/// root `App` component; all mutation goes through the transition
/// methods below so the session client and the tests share one set of
/// semantics.
///
/// Invariants:
/// - `is_authenticated` is true only while `token` is present.
/// - `epoch` increments on every login/logout boundary; an async
///   outcome captured under an older epoch must be discarded instead of
///   applied (a stale refresh completing after logout must not
///   re-authenticate the session).
/// - At most one user-data refresh loop is live; `try_begin_refresh`
///   enforces this.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Whether the periodic user-data refresh loop is running.
    pub refresh_active: bool,
    /// Guards `initialize_auth` against overlapping navigations.
    pub initializing: bool,
    /// Login/logout generation counter for stale-outcome detection.
    pub epoch: u64,
    /// Persistence strategy: when false only the token is stored and
    /// the user record is re-fetched on every load.
    pub persist_user: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            is_authenticated: false,
            loading: false,
            error: None,
            refresh_active: false,
            initializing: false,
            epoch: 0,
            persist_user: true,
        }
    }
}

impl SessionState {
    /// Rebuild state from durable storage at startup. A stored token is
    /// enough to count as authenticated; the user record may or may not
    /// have been persisted depending on strategy.
    pub fn restore(token: Option<String>, user: Option<User>, persist_user: bool) -> Self {
        Self {
            is_authenticated: token.is_some(),
            user: if token.is_some() { user } else { None },
            token,
            persist_user,
            ..Self::default()
        }
    }

    /// Authenticated with a loaded user record.
    pub fn is_logged_in(&self) -> bool {
        self.is_authenticated && self.user.is_some()
    }

    /// Enter the authenticated state after a successful login or
    /// registration.
    pub fn apply_login(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
        self.is_authenticated = true;
        self.error = None;
        self.epoch += 1;
    }

    /// Clear the session. Idempotent; leaves `error` alone so a
    /// session-ending message set just before logout survives for the
    /// UI.
    pub fn apply_logout(&mut self) {
        self.token = None;
        self.user = None;
        self.is_authenticated = false;
        self.refresh_active = false;
        self.initializing = false;
        self.epoch += 1;
    }

    /// Replace the user record from a `/auth/me` fetch started under
    /// `epoch`. Returns false (and changes nothing) when the session
    /// has since crossed a login/logout boundary or lost its token.
    pub fn apply_user(&mut self, epoch: u64, user: User) -> bool {
        if self.epoch != epoch || self.token.is_none() {
            return false;
        }
        self.user = Some(user);
        self.is_authenticated = true;
        true
    }

    /// Swap in a freshly issued token from `/auth/refresh`, started
    /// under `epoch`. Stale outcomes are discarded as in `apply_user`.
    pub fn apply_token(&mut self, epoch: u64, token: String) -> bool {
        if self.epoch != epoch || self.token.is_none() {
            return false;
        }
        self.token = Some(token);
        true
    }

    /// Mark the refresh loop as running. Returns false when a loop is
    /// already active, making a second start a no-op.
    pub fn try_begin_refresh(&mut self) -> bool {
        if self.refresh_active {
            return false;
        }
        self.refresh_active = true;
        true
    }

    pub fn end_refresh(&mut self) {
        self.refresh_active = false;
    }
}
