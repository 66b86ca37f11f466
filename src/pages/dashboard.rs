//! Authenticated landing page.

use leptos::prelude::*;

use crate::net::session_client;
use crate::routes;
use crate::state::session::SessionState;

#[component]
pub fn DashboardPage() -> impl IntoView {
    routes::enforce(routes::DASHBOARD.access);

    let session = expect_context::<RwSignal<SessionState>>();

    let on_logout = move |_| {
        leptos::task::spawn_local(async move {
            session_client::logout(session).await;
        });
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>
                    {move || {
                        session
                            .get()
                            .user
                            .map_or_else(|| "Dashboard".to_owned(), |u| {
                                format!("Welcome back, {}", u.first_name)
                            })
                    }}
                </h1>
                <nav>
                    <a href="/profile">"Profile"</a>
                    {move || {
                        session
                            .get()
                            .user
                            .is_some_and(|u| u.is_admin)
                            .then(|| view! { <a href="/admin">"Admin"</a> })
                    }}
                    <button class="btn" on:click=on_logout>
                        "Sign out"
                    </button>
                </nav>
            </header>

            <section class="dashboard-page__summary">
                {move || {
                    session.get().user.map(|u| {
                        view! {
                            <p>
                                "Distances shown in "
                                {u.distance_unit.as_str()}
                                "."
                            </p>
                        }
                    })
                }}
            </section>
        </div>
    }
}
