//! Shared client-side state.
//!
//! The session model lives here; pages read it through the
//! `RwSignal<SessionState>` context provided by `App` and mutate it via
//! the operations in `net::session_client`.

pub mod session;
