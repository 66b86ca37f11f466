//! Durable session persistence via `localStorage`.
//!
//! Two keys: `token` holds the raw bearer token, `user` a JSON-serialised
//! [`User`] record. Writes are last-write-wins with no grouping; whether
//! the user record is persisted at all is decided by the session state's
//! persistence strategy, not here. Requires a browser environment — on
//! the server every helper is inert.

use crate::net::types::User;

#[cfg(feature = "hydrate")]
const TOKEN_KEY: &str = "token";
#[cfg(feature = "hydrate")]
const USER_KEY: &str = "user";

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the persisted bearer token, if any.
pub fn read_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?.get_item(TOKEN_KEY).ok().flatten()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn write_token(token: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}

/// Read the persisted user record. A missing or undecodable entry reads
/// as `None`, forcing a re-fetch.
pub fn read_user() -> Option<User> {
    #[cfg(feature = "hydrate")]
    {
        let raw = local_storage()?.get_item(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn write_user(user: &User) {
    #[cfg(feature = "hydrate")]
    {
        if let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(user)) {
            let _ = storage.set_item(USER_KEY, &raw);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user;
    }
}

/// Remove both session keys. Safe to call when nothing is stored.
pub fn clear_session() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }
}
