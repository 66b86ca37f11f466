//! Admin landing page. The guard turns non-admin sessions back to the
//! dashboard before anything here matters.

use leptos::prelude::*;

use crate::routes;

#[component]
pub fn AdminPage() -> impl IntoView {
    routes::enforce(routes::ADMIN.access);

    view! {
        <div class="admin-page">
            <h1>"Administration"</h1>
            <p>"Course, club, and member management."</p>
            <a href="/dashboard">"Back to dashboard"</a>
        </div>
    }
}
