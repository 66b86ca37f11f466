//! Page components, one per route. Each page installs the navigation
//! guard for its own access requirements via `routes::enforce`.

pub mod admin;
pub mod dashboard;
pub mod profile;
pub mod register;
pub mod welcome;
