//! Role-based authorization

use tracing::debug;

use crate::domain::entities::{Principal, Role};
use crate::errors::GateError;

/// Admits principals holding any of a fixed set of roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    allowed: Vec<Role>,
}

impl RoleGate {
    /// Gate admitting any of `roles`. An empty set admits nobody.
    pub fn require_any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed
    }

    /// Check the principal attached by authentication.
    ///
    /// `None` means the chain reached this gate without authenticating,
    /// which is reported as `ContextMissing` rather than a denial.
    pub fn authorize(&self, principal: Option<&Principal>) -> Result<(), GateError> {
        let principal = principal.ok_or(GateError::ContextMissing)?;

        if principal.has_any_role(&self.allowed) {
            Ok(())
        } else {
            debug!(
                user_id = principal.id,
                role = %principal.role,
                "Role not permitted"
            );
            Err(GateError::PermissionDenied)
        }
    }
}
