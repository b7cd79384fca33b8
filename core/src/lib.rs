//! # Sentinel Core
//!
//! Admission control for the Sentinel gate. This crate contains the domain
//! types, the error taxonomy, the identity resolver interface and the three
//! gate services evaluated for every request:
//!
//! 1. [`services::rate_limit::RateGate`] - global, per-client and per-route token buckets
//! 2. [`services::auth::AuthGate`] - credential validation and identity resolution
//! 3. [`services::auth::RoleGate`] - role based authorization

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
