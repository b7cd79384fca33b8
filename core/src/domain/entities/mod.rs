//! Domain entities representing identities and credentials.

pub mod claims;
pub mod principal;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use claims::Claims;
pub use principal::{Principal, Role};
