//! Authentication and authorization gates
//!
//! This module provides the two identity stages of the admission chain:
//! - `AuthGate`: validates the bearer credential and resolves the principal
//! - `RoleGate`: checks the resolved principal against a set of allowed roles

mod gate;
mod role;

#[cfg(test)]
mod tests;

pub use gate::AuthGate;
pub use role::RoleGate;
