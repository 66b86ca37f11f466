//! # fairway-client
//!
//! Leptos + WASM frontend for the Fairway golf score tracker. This crate
//! holds the client-side session store (login, refresh, logout,
//! permission-change handling), the route guard, and thin page
//! components over the REST API.

pub mod app;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// Client-side entry point, called from the generated JS glue.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
