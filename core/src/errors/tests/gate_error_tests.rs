//! Unit tests for gate error types

use std::time::Duration;

use crate::errors::{GateError, TokenError};
use crate::services::rate_limit::Tier;

#[test]
fn test_status_codes() {
    let limited = GateError::RateLimitExceeded {
        tier: Tier::Client,
        retry_after: Duration::from_millis(200),
    };
    assert_eq!(limited.status_code(), 429);
    assert_eq!(GateError::CredentialMissing.status_code(), 401);
    assert_eq!(GateError::Credential(TokenError::Malformed).status_code(), 401);
    assert_eq!(GateError::Credential(TokenError::Unverifiable).status_code(), 401);
    assert_eq!(GateError::Credential(TokenError::Expired).status_code(), 401);
    assert_eq!(GateError::Credential(TokenError::InvalidSubject).status_code(), 401);
    assert_eq!(GateError::IdentityNotFound.status_code(), 401);
    assert_eq!(GateError::ContextMissing.status_code(), 401);
    assert_eq!(GateError::PermissionDenied.status_code(), 403);
}

#[test]
fn test_rate_limit_messages_name_the_tier() {
    let message = |tier| {
        GateError::RateLimitExceeded {
            tier,
            retry_after: Duration::from_secs(1),
        }
        .to_string()
    };

    assert_eq!(message(Tier::Global), "global rate limit exceeded");
    assert_eq!(message(Tier::Client), "too many requests from this IP");
    assert_eq!(message(Tier::Route), "route rate limit exceeded");
}

#[test]
fn test_token_errors_convert_transparently() {
    let err: GateError = TokenError::Expired.into();
    assert_eq!(err, GateError::Credential(TokenError::Expired));
    assert_eq!(err.to_string(), "token expired");
    assert_eq!(err.error_code(), "TOKEN_EXPIRED");
}

#[test]
fn test_retry_after_rounds_up_to_whole_seconds() {
    let err = |retry_after| GateError::RateLimitExceeded {
        tier: Tier::Global,
        retry_after,
    };

    assert_eq!(err(Duration::from_millis(1)).retry_after_secs(), Some(1));
    assert_eq!(err(Duration::ZERO).retry_after_secs(), Some(1));
    assert_eq!(err(Duration::from_millis(1500)).retry_after_secs(), Some(2));
    assert_eq!(err(Duration::from_secs(3)).retry_after_secs(), Some(3));
    assert_eq!(GateError::PermissionDenied.retry_after_secs(), None);
}
