//! Root application component with routing and the session context.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{
    admin::AdminPage, dashboard::DashboardPage, profile::ProfilePage, register::RegisterPage,
    welcome::WelcomePage,
};
use crate::routes;
use crate::state::session::SessionState;
use crate::util::storage;

/// Whether the user record is persisted alongside the token. When
/// false, every load re-fetches the user from `/auth/me`.
pub const PERSIST_USER: bool = true;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Restores the session from durable storage, provides it as context,
/// and sets up client-side routing. Each page installs its own guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(restore_session());
    provide_context(session);

    view! {
        <Stylesheet id="leptos" href="/pkg/fairway-client.css"/>
        <Title text="Fairway"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment(routes::WELCOME.segment) view=WelcomePage/>
                <Route path=StaticSegment(routes::REGISTER.segment) view=RegisterPage/>
                <Route path=StaticSegment(routes::DASHBOARD.segment) view=DashboardPage/>
                <Route path=StaticSegment(routes::PROFILE.segment) view=ProfilePage/>
                <Route path=StaticSegment(routes::ADMIN.segment) view=AdminPage/>
            </Routes>
        </Router>
    }
}

/// Hydrate the session from durable storage. A stored user is only
/// honoured under the persisted-user strategy; otherwise the guard's
/// lazy bootstrap re-fetches it.
fn restore_session() -> SessionState {
    let token = storage::read_token();
    let user = if PERSIST_USER { storage::read_user() } else { None };
    SessionState::restore(token, user, PERSIST_USER)
}
