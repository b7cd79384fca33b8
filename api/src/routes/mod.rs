//! Route handlers
//!
//! - `health` - liveness endpoint
//! - `auth` - session endpoints
//! - `users` - authenticated user endpoints

pub mod auth;
pub mod health;
pub mod users;
