//! Credential validation followed by identity resolution

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::Principal;
use crate::errors::GateError;
use crate::repositories::IdentityResolver;
use crate::services::token::TokenValidator;

/// Turns a bearer credential into the request's principal
#[derive(Clone)]
pub struct AuthGate {
    validator: TokenValidator,
    resolver: Arc<dyn IdentityResolver>,
}

impl AuthGate {
    /// Create a new authentication gate
    ///
    /// # Arguments
    ///
    /// * `validator` - Validator holding the shared signing secret
    /// * `resolver` - Authoritative source of principals
    pub fn new(validator: TokenValidator, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { validator, resolver }
    }

    /// Authenticate a request from its credential cookie value.
    ///
    /// This method:
    /// 1. Rejects an absent or empty credential
    /// 2. Validates algorithm, signature, expiry and subject
    /// 3. Resolves the subject to a principal, ignoring any embedded role
    ///
    /// A failing resolver is treated the same as an unknown subject.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Principal, GateError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GateError::CredentialMissing)?;

        let claims = self.validator.validate(token).map_err(|e| {
            debug!(reason = %e, "Credential rejected");
            GateError::from(e)
        })?;

        match self.resolver.find_by_id(claims.sub).await {
            Ok(Some(principal)) => Ok(principal),
            Ok(None) => {
                debug!(subject = claims.sub, "No identity for subject");
                Err(GateError::IdentityNotFound)
            }
            Err(e) => {
                warn!(subject = claims.sub, error = %e, "Identity lookup failed");
                Err(GateError::IdentityNotFound)
            }
        }
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
