//! Unit tests for credential claims

use chrono::Duration;

use crate::domain::entities::claims::Claims;

#[test]
fn test_new_claims() {
    let claims = Claims::new(42, Some("user".to_string()), Duration::hours(1));

    assert_eq!(claims.sub, 42);
    assert_eq!(claims.role.as_deref(), Some("user"));
    let iat = claims.iat.unwrap();
    assert_eq!(claims.exp - iat, 3600);
    assert!(!claims.is_expired());
}

#[test]
fn test_expired_claims() {
    let claims = Claims::new(42, None, Duration::seconds(-10));
    assert!(claims.is_expired());

    let boundary = Claims::new(42, None, Duration::zero());
    assert!(boundary.is_expired());
}

#[test]
fn test_optional_claims_are_omitted() {
    let claims = Claims {
        sub: 1,
        iat: None,
        exp: 100,
        role: None,
    };
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json, serde_json::json!({ "sub": 1, "exp": 100 }));
}
