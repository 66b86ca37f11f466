//! Registration page. Guest-only; a successful registration
//! authenticates the session and the guard moves it to the dashboard.

use leptos::prelude::*;

use crate::net::session_client;
use crate::net::types::{DistanceUnit, RegisterData};
use crate::routes;
use crate::state::session::SessionState;

#[component]
pub fn RegisterPage() -> impl IntoView {
    routes::enforce(routes::REGISTER.access);

    let session = expect_context::<RwSignal<SessionState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let distance_unit = RwSignal::new("meters".to_owned());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let data = RegisterData {
            email: email.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
            first_name: first_name.get_untracked().trim().to_owned(),
            last_name: last_name.get_untracked().trim().to_owned(),
            sex: None,
            distance_unit: Some(DistanceUnit::normalize(&distance_unit.get_untracked())),
            timezone: None,
        };
        if data.email.is_empty()
            || data.password.is_empty()
            || data.first_name.is_empty()
            || data.last_name.is_empty()
        {
            return;
        }
        leptos::task::spawn_local(async move {
            let _ = session_client::register(session, &data).await;
        });
    };

    let text_field = |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <label>
                {label}
                <input
                    type=kind
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="register-page">
            <h1>"Create your Fairway account"</h1>

            <form class="register-page__form" on:submit=submit>
                {text_field("First name", "text", first_name)}
                {text_field("Last name", "text", last_name)}
                {text_field("Email", "email", email)}
                {text_field("Password", "password", password)}

                <label>
                    "Distance unit"
                    <select on:change=move |ev| distance_unit.set(event_target_value(&ev))>
                        <option value="meters" selected=move || distance_unit.get() == "meters">
                            "Meters"
                        </option>
                        <option value="yards" selected=move || distance_unit.get() == "yards">
                            "Yards"
                        </option>
                    </select>
                </label>

                {move || {
                    session.get().error.map(|message| {
                        view! { <p class="register-page__error">{message}</p> }
                    })
                }}

                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || session.get().loading
                >
                    "Register"
                </button>
            </form>

            <a href="/">"Back to sign in"</a>
        </div>
    }
}
