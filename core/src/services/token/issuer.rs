//! Credential issuance with the validator's shared secret

use std::fmt;

use chrono::Duration;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::{Claims, Role};
use crate::errors::TokenError;

/// Signs HS256 tokens carrying `sub`, `iat`, `exp` and an informational role
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    /// Signs a token for `subject` expiring after `ttl`
    pub fn issue(&self, subject: u64, role: Option<Role>, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role.map(|r| r.as_str().to_owned()), ttl);
        self.sign(&claims)
    }

    /// Signs a token for `subject` with the configured lifetime
    pub fn issue_default(&self, subject: u64, role: Option<Role>) -> Result<String, TokenError> {
        self.issue(subject, role, self.default_ttl)
    }

    /// Signs arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|_| TokenError::GenerationFailed)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
