//! Welcome page: login form and password-reset request. Guest-only;
//! an authenticated session is redirected to the dashboard by the guard.

use leptos::prelude::*;

use crate::net::session_client;
use crate::routes;
use crate::state::session::SessionState;

#[component]
pub fn WelcomePage() -> impl IntoView {
    routes::enforce(routes::WELCOME.access);

    let session = expect_context::<RwSignal<SessionState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_reset = RwSignal::new(false);
    let reset_notice = RwSignal::new(None::<String>);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let email = email.get_untracked();
        let password = password.get_untracked();
        if email.trim().is_empty() || password.is_empty() {
            return;
        }
        leptos::task::spawn_local(async move {
            // Success redirects via the guard; failure lands in
            // session.error.
            let _ = session_client::login(session, email.trim(), &password).await;
        });
    };

    let request_reset = move |_| {
        let email = email.get_untracked();
        if email.trim().is_empty() {
            reset_notice.set(Some("Enter your email address first".to_owned()));
            return;
        }
        leptos::task::spawn_local(async move {
            let notice = match session_client::request_password_reset(session, email.trim()).await
            {
                Ok(message) | Err(message) => message,
            };
            reset_notice.set(Some(notice));
        });
    };

    view! {
        <div class="welcome-page">
            <h1>"Fairway"</h1>
            <p>"Track your rounds, scores, and handicap"</p>

            <form class="welcome-page__form" on:submit=submit>
                <label>
                    "Email"
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>

                {move || {
                    session.get().error.map(|message| {
                        view! { <p class="welcome-page__error">{message}</p> }
                    })
                }}

                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || session.get().loading
                >
                    "Sign in"
                </button>
            </form>

            <div class="welcome-page__footer">
                <a href="/register">"Create an account"</a>
                <button class="btn btn--link" on:click=move |_| show_reset.set(!show_reset.get())>
                    "Forgot password?"
                </button>
            </div>

            {move || {
                show_reset.get().then(|| {
                    view! {
                        <div class="welcome-page__reset">
                            <button class="btn" on:click=request_reset>
                                "Send reset email"
                            </button>
                            {move || {
                                reset_notice.get().map(|notice| view! { <p>{notice}</p> })
                            }}
                        </div>
                    }
                })
            }}
        </div>
    }
}
