//! Shared error types and response structures

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors detected while loading or validating settings.
///
/// These are construction-time failures: a gate built from an invalid
/// configuration must never start serving requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("rate limiter config for {tier}: rps must be > 0 (got {value})")]
    InvalidRate { tier: String, value: f64 },

    #[error("rate limiter config for {tier}: burst must be >= 1")]
    InvalidBurst { tier: String },

    #[error("config: {field} must be greater than zero")]
    InvalidDuration { field: String },

    #[error("config: {field} must not exceed {max_secs} seconds")]
    DurationTooLong { field: String, max_secs: u64 },

    #[error("config: missing {name}")]
    MissingValue { name: String },

    #[error("config: invalid {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Standard error body used by every gate rejection: `{"error": <message>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Machine-readable error codes, used in logs alongside the message
pub mod error_codes {
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const FORBIDDEN: &str = "FORBIDDEN";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serializes_single_field() {
        let body = serde_json::to_value(ErrorResponse::new("user not found")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "user not found" }));
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidBurst {
            tier: "client".to_string(),
        };
        assert_eq!(err.to_string(), "rate limiter config for client: burst must be >= 1");
    }
}
