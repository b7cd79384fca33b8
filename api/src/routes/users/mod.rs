//! Authenticated user route handlers

pub mod admin;
pub mod profile;

pub use admin::admin_dashboard;
pub use profile::profile;
