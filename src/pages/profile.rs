//! Profile edit page over the session's update-profile operation.

use leptos::prelude::*;

use crate::net::session_client;
use crate::net::types::ProfileUpdate;
use crate::routes;
use crate::state::session::SessionState;

#[component]
pub fn ProfilePage() -> impl IntoView {
    routes::enforce(routes::PROFILE.access);

    let session = expect_context::<RwSignal<SessionState>>();

    // Seed the form from the cached user; a later fetch completing does
    // not clobber in-progress edits.
    let current = session.get_untracked().user;
    let field = |value: Option<String>| RwSignal::new(value.unwrap_or_default());

    let first_name = field(current.as_ref().map(|u| u.first_name.clone()));
    let last_name = field(current.as_ref().map(|u| u.last_name.clone()));
    let sex = field(current.as_ref().and_then(|u| u.sex.clone()));
    let country = field(current.as_ref().and_then(|u| u.country.clone()));
    let city = field(current.as_ref().and_then(|u| u.city.clone()));
    let address = field(current.as_ref().and_then(|u| u.address.clone()));
    let postal_code = field(current.as_ref().and_then(|u| u.postal_code.clone()));
    let timezone = field(current.as_ref().and_then(|u| u.timezone.clone()));
    let distance_unit = field(
        current
            .as_ref()
            .map(|u| u.distance_unit.as_str().to_owned()),
    );
    let saved = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        saved.set(false);
        let input = ProfileUpdate {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            sex: sex.get_untracked(),
            country: country.get_untracked(),
            city: city.get_untracked(),
            address: address.get_untracked(),
            postal_code: postal_code.get_untracked(),
            timezone: timezone.get_untracked(),
            distance_unit: distance_unit.get_untracked(),
        };
        leptos::task::spawn_local(async move {
            if session_client::update_profile(session, &input).await.is_ok() {
                saved.set(true);
            }
        });
    };

    let text_field = |label: &'static str, value: RwSignal<String>| {
        view! {
            <label>
                {label}
                <input
                    type="text"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="profile-page">
            <h1>"Profile"</h1>

            <form class="profile-page__form" on:submit=submit>
                {text_field("First name", first_name)}
                {text_field("Last name", last_name)}

                <label>
                    "Sex"
                    <select on:change=move |ev| sex.set(event_target_value(&ev))>
                        <option value="" selected=move || sex.get().is_empty()>
                            "Not specified"
                        </option>
                        <option value="M" selected=move || sex.get() == "M">"Male"</option>
                        <option value="F" selected=move || sex.get() == "F">"Female"</option>
                    </select>
                </label>

                {text_field("Country", country)}
                {text_field("City", city)}
                {text_field("Address", address)}
                {text_field("Postal code", postal_code)}
                {text_field("Timezone", timezone)}

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
                        view! { <p class="profile-page__error">{message}</p> }
                    })
                }}
                {move || {
                    saved.get().then(|| view! { <p class="profile-page__saved">"Profile saved"</p> })
                }}

                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || session.get().loading
                >
                    "Save"
                </button>
            </form>

            <a href="/dashboard">"Back to dashboard"</a>
        </div>
    }
}
