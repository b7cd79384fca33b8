//! In-memory identity directory

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::entities::{Principal, Role};
use crate::errors::DomainError;

use super::trait_::IdentityResolver;

/// Identity resolver backed by a shared map
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityResolver {
    principals: Arc<RwLock<HashMap<u64, Principal>>>,
}

impl InMemoryIdentityResolver {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `principals`
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let map = principals.into_iter().map(|p| (p.id, p)).collect();
        Self {
            principals: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a JSON list of `{"id": .., "role": ..}` objects
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Unavailable {
                message: format!("failed to read identity file {}: {}", path.display(), e),
            })?;

        let principals: Vec<Principal> =
            serde_json::from_str(&content).map_err(|e| DomainError::Internal {
                message: format!("invalid identity file {}: {}", path.display(), e),
            })?;

        info!(count = principals.len(), path = %path.display(), "Loaded identity directory");
        Ok(Self::with_principals(principals))
    }

    /// Insert or replace a principal. Takes effect on the next request.
    pub async fn insert(&self, id: u64, role: Role) {
        self.principals
            .write()
            .await
            .insert(id, Principal::new(id, role));
    }

    /// Remove a principal, returning it if present
    pub async fn remove(&self, id: u64) -> Option<Principal> {
        self.principals.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.principals.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn find_by_id(&self, id: u64) -> Result<Option<Principal>, DomainError> {
        let principals = self.principals.read().await;
        Ok(principals.get(&id).cloned())
    }
}
