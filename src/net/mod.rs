//! REST client, wire types, and session orchestration.

pub mod api;
pub mod error;
pub mod session_client;
pub mod types;
