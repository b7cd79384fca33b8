//! Domain layer containing the identity and credential entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
