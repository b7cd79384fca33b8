//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{GateError, TokenError};

use thiserror::Error;

/// Errors raised by the identity store
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}
