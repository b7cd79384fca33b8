//! Unit tests for the authentication gate

use chrono::Duration;
use std::sync::Arc;

use super::mocks::{CountingResolver, UnavailableResolver};
use crate::domain::entities::{Principal, Role};
use crate::errors::{GateError, TokenError};
use crate::repositories::InMemoryIdentityResolver;
use crate::services::auth::AuthGate;
use crate::services::token::{TokenIssuer, TokenValidator};

const SECRET: &str = "auth-gate-test-secret";

fn issuer() -> TokenIssuer {
    TokenIssuer::new(SECRET, Duration::hours(1))
}

fn directory() -> InMemoryIdentityResolver {
    InMemoryIdentityResolver::with_principals([
        Principal::new(1, Role::Admin),
        Principal::new(2, Role::User),
    ])
}

fn gate(resolver: InMemoryIdentityResolver) -> AuthGate {
    AuthGate::new(TokenValidator::new(SECRET), Arc::new(resolver))
}

#[tokio::test]
async fn test_valid_credential_resolves_principal() {
    let token = issuer().issue_default(2, Some(Role::User)).unwrap();
    let principal = gate(directory()).authenticate(Some(&token)).await.unwrap();

    assert_eq!(principal, Principal::new(2, Role::User));
}

#[tokio::test]
async fn test_missing_credential() {
    let gate = gate(directory());

    assert_eq!(gate.authenticate(None).await, Err(GateError::CredentialMissing));
    assert_eq!(gate.authenticate(Some("")).await, Err(GateError::CredentialMissing));
    assert_eq!(gate.authenticate(Some("   ")).await, Err(GateError::CredentialMissing));
}

#[tokio::test]
async fn test_credential_errors_are_propagated() {
    let gate = gate(directory());

    let untrusted = TokenIssuer::new("untrusted", Duration::hours(1))
        .issue_default(1, None)
        .unwrap();
    assert_eq!(
        gate.authenticate(Some(&untrusted)).await,
        Err(GateError::Credential(TokenError::Unverifiable))
    );

    assert_eq!(
        gate.authenticate(Some("garbage")).await,
        Err(GateError::Credential(TokenError::Malformed))
    );

    let expired = issuer().issue(1, None, Duration::seconds(-30)).unwrap();
    assert_eq!(
        gate.authenticate(Some(&expired)).await,
        Err(GateError::Credential(TokenError::Expired))
    );
}

#[tokio::test]
async fn test_unknown_subject_is_rejected() {
    let token = issuer().issue_default(99, Some(Role::Admin)).unwrap();
    let result = gate(directory()).authenticate(Some(&token)).await;

    assert_eq!(result, Err(GateError::IdentityNotFound));
}

#[tokio::test]
async fn test_resolver_failure_fails_closed() {
    let gate = AuthGate::new(TokenValidator::new(SECRET), Arc::new(UnavailableResolver));
    let token = issuer().issue_default(1, None).unwrap();

    assert_eq!(gate.authenticate(Some(&token)).await, Err(GateError::IdentityNotFound));
}

#[tokio::test]
async fn test_embedded_role_is_not_trusted() {
    // The token claims admin but the directory says user
    let token = issuer().issue_default(2, Some(Role::Admin)).unwrap();
    let principal = gate(directory()).authenticate(Some(&token)).await.unwrap();

    assert_eq!(principal.role, Role::User);
}

#[tokio::test]
async fn test_role_changes_apply_to_existing_tokens() {
    let directory = directory();
    let gate = gate(directory.clone());
    let token = issuer().issue_default(1, Some(Role::Admin)).unwrap();

    assert!(gate.authenticate(Some(&token)).await.unwrap().is_admin());

    directory.insert(1, Role::User).await;
    assert_eq!(gate.authenticate(Some(&token)).await.unwrap().role, Role::User);

    directory.remove(1).await;
    assert_eq!(gate.authenticate(Some(&token)).await, Err(GateError::IdentityNotFound));
}

#[tokio::test]
async fn test_identity_is_resolved_on_every_request() {
    let resolver = Arc::new(CountingResolver::new(directory()));
    let gate = AuthGate::new(TokenValidator::new(SECRET), resolver.clone());
    let token = issuer().issue_default(1, None).unwrap();

    for _ in 0..3 {
        gate.authenticate(Some(&token)).await.unwrap();
    }
    assert_eq!(resolver.lookups(), 3);

    // Invalid credentials never reach the resolver
    let _ = gate.authenticate(Some("garbage")).await;
    let _ = gate.authenticate(None).await;
    assert_eq!(resolver.lookups(), 3);
}
