//! Principal entity: the resolved identity attached to an admitted request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles known to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular authenticated user
    User,
    /// An administrator
    Admin,
}

impl Role {
    /// Canonical lowercase name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Exact, case-sensitive match against the canonical names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Authoritative identity of a request, resolved fresh on every request.
///
/// The role here always comes from the identity store, never from the
/// credential, so a revoked role cannot outlive the token that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque user identifier
    pub id: u64,

    /// Current role of the user
    pub role: Role,
}

impl Principal {
    /// Creates a new principal
    pub fn new(id: u64, role: Role) -> Self {
        Self { id, role }
    }

    /// Checks whether the principal holds one of the given roles
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Checks if the principal is an administrator
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
