//! Identity resolver trait: the boundary to the user store.
//!
//! The gate never caches what a resolver returns. Every authenticated
//! request performs one lookup, so role changes take effect immediately.

use async_trait::async_trait;

use crate::domain::entities::Principal;
use crate::errors::DomainError;

/// Maps a validated subject to the current principal
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use sentinel_core::repositories::IdentityResolver;
/// use sentinel_core::domain::entities::{Principal, Role};
/// use sentinel_core::errors::DomainError;
///
/// struct StaticResolver;
///
/// #[async_trait]
/// impl IdentityResolver for StaticResolver {
///     async fn find_by_id(&self, id: u64) -> Result<Option<Principal>, DomainError> {
///         Ok((id == 1).then(|| Principal::new(1, Role::Admin)))
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up the principal for a subject ID
    ///
    /// # Returns
    /// * `Ok(Some(Principal))` - Identity found
    /// * `Ok(None)` - No identity with this ID
    /// * `Err(DomainError)` - The store could not be queried
    async fn find_by_id(&self, id: u64) -> Result<Option<Principal>, DomainError>;
}
