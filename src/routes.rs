//! Route table and navigation guard.
//!
//! Every page declares its access requirements here; [`decide`] is the
//! pure guard policy and [`enforce`] wires it into a page component.
//! Redirect checks apply in a fixed precedence: auth, then admin, then
//! guest. A route that somehow sets several flags is therefore resolved
//! the same way on every navigation.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::session_client;
use crate::state::session::SessionState;

/// Landing route for anonymous visitors.
pub const GUEST_LANDING: &str = "/";
/// Landing route after authentication.
pub const AUTH_LANDING: &str = "/dashboard";

/// Per-route access requirements. Static after startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteAccess {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_admin: bool,
}

impl RouteAccess {
    pub const GUEST_ONLY: Self = Self {
        requires_auth: false,
        requires_guest: true,
        requires_admin: false,
    };
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_guest: false,
        requires_admin: false,
    };
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_guest: false,
        requires_admin: true,
    };
}

/// One row of the route table: path, name, and access metadata. The
/// leading path segment is kept separately because the router builds
/// its matchers from segments.
#[derive(Clone, Copy, Debug)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub segment: &'static str,
    pub name: &'static str,
    pub access: RouteAccess,
}

pub const WELCOME: RouteDescriptor = RouteDescriptor {
    path: "/",
    segment: "",
    name: "Welcome",
    access: RouteAccess::GUEST_ONLY,
};
pub const REGISTER: RouteDescriptor = RouteDescriptor {
    path: "/register",
    segment: "register",
    name: "Register",
    access: RouteAccess::GUEST_ONLY,
};
pub const DASHBOARD: RouteDescriptor = RouteDescriptor {
    path: "/dashboard",
    segment: "dashboard",
    name: "Dashboard",
    access: RouteAccess::AUTHENTICATED,
};
pub const PROFILE: RouteDescriptor = RouteDescriptor {
    path: "/profile",
    segment: "profile",
    name: "Profile",
    access: RouteAccess::AUTHENTICATED,
};
pub const ADMIN: RouteDescriptor = RouteDescriptor {
    path: "/admin",
    segment: "admin",
    name: "Admin",
    access: RouteAccess::ADMIN,
};

pub const ROUTES: &[RouteDescriptor] = &[WELCOME, REGISTER, DASHBOARD, PROFILE, ADMIN];

/// Guard verdict for one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Pure guard policy: auth, then admin, then guest.
///
/// Authentication is judged on the token-backed flag rather than a
/// loaded user record, so a restored session is not bounced to the
/// welcome page while its user fetch is still in flight. The admin
/// check does require the loaded record, since the flag lives on it.
pub fn decide(access: RouteAccess, session: &SessionState) -> GuardDecision {
    if access.requires_auth && !session.is_authenticated {
        return GuardDecision::Redirect(GUEST_LANDING);
    }
    if access.requires_admin && !session.user.as_ref().is_some_and(|u| u.is_admin) {
        return GuardDecision::Redirect(AUTH_LANDING);
    }
    if access.requires_guest && session.is_authenticated {
        return GuardDecision::Redirect(AUTH_LANDING);
    }
    GuardDecision::Allow
}

/// Install the guard on the calling page: lazily bootstrap a restored
/// session (token present, user not yet loaded) and redirect whenever
/// [`decide`] says so. Re-evaluates on every session change.
pub fn enforce(access: RouteAccess) {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();

    Effect::new(move || {
        let state = session.get();
        if state.token.is_some() && state.user.is_none() && !state.initializing {
            leptos::task::spawn_local(session_client::initialize_auth(session));
        }
        if let GuardDecision::Redirect(target) = decide(access, &state) {
            navigate(target, NavigateOptions::default());
        }
    });
}
