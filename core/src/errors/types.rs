//! Request-local rejection types for the admission gate
//!
//! Every variant is terminal for the request that produced it: the gate
//! never retries a failed check. Status codes are plain numbers so this
//! crate stays independent of the HTTP framework.

use std::time::Duration;

use sentinel_shared::error_codes;
use thiserror::Error;

use crate::services::rate_limit::Tier;

/// Credential validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token cannot be parsed
    #[error("malformed token")]
    Malformed,

    /// Bad signature or a signing algorithm outside the HMAC family
    #[error("token signature could not be verified")]
    Unverifiable,

    #[error("token expired")]
    Expired,

    /// `sub` missing or not an unsigned integer
    #[error("invalid token subject")]
    InvalidSubject,

    #[error("failed to generate token")]
    GenerationFailed,
}

/// Reasons a request is rejected by the gate chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("{}", tier.rejection_message())]
    RateLimitExceeded { tier: Tier, retry_after: Duration },

    #[error("no token provided")]
    CredentialMissing,

    #[error(transparent)]
    Credential(#[from] TokenError),

    #[error("user not found")]
    IdentityNotFound,

    /// No principal attached; the chain was assembled without authentication
    #[error("authentication required")]
    ContextMissing,

    #[error("permission denied")]
    PermissionDenied,
}

impl GateError {
    /// HTTP status code for this rejection
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::RateLimitExceeded { .. } => 429,
            GateError::PermissionDenied => 403,
            GateError::CredentialMissing
            | GateError::Credential(_)
            | GateError::IdentityNotFound
            | GateError::ContextMissing => 401,
        }
    }

    /// Machine-readable code used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::RateLimitExceeded { .. } => error_codes::RATE_LIMIT_EXCEEDED,
            GateError::CredentialMissing | GateError::ContextMissing => error_codes::UNAUTHORIZED,
            GateError::Credential(TokenError::Expired) => error_codes::TOKEN_EXPIRED,
            GateError::Credential(_) => error_codes::TOKEN_INVALID,
            GateError::IdentityNotFound => error_codes::NOT_FOUND,
            GateError::PermissionDenied => error_codes::FORBIDDEN,
        }
    }

    /// Seconds a client should wait before retrying, for rate rejections
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            GateError::RateLimitExceeded { retry_after, .. } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Some(secs.max(1))
            }
            _ => None,
        }
    }
}
