//! Claims carried by a bearer credential.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Verified content of a bearer credential.
///
/// `role` is informational only: authorization decisions use the role
/// returned by the identity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: u64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration timestamp
    pub exp: i64,

    /// Role at issuance time (never trusted for authorization)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Creates claims for `subject` that expire after `ttl`
    pub fn new(subject: u64, role: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject,
            iat: Some(now.timestamp()),
            exp: (now + ttl).timestamp(),
            role,
        }
    }

    /// Checks if the claims have expired. A token expiring this very
    /// second is already expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
