//! Lazily populated map of token buckets keyed by scope.
//!
//! The map lock covers only insertion, touch and eviction. Token checks run
//! against the returned `Arc<TokenBucket>` after the lock is released, so
//! the per-bucket mutex and the map mutex are never held together.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sentinel_shared::{ConfigError, TierLimit};

use super::clock::Clock;
use super::token_bucket::TokenBucket;

#[derive(Debug)]
struct ScopedEntry {
    bucket: Arc<TokenBucket>,
    last_seen: Instant,
}

/// Owns the buckets of one tier, one bucket per key
#[derive(Debug)]
pub struct ScopedLimiterRegistry {
    tier: String,
    limit: TierLimit,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, ScopedEntry>>,
}

impl ScopedLimiterRegistry {
    /// Creates an empty registry whose buckets use `limit`
    pub fn new(tier: &str, limit: TierLimit, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        limit.validate(tier)?;
        Ok(Self {
            tier: tier.to_owned(),
            limit,
            clock,
            entries: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the bucket for `key`, creating a full one if absent, and
    /// refreshes the entry's last-seen time.
    pub fn get_or_create(&self, key: &str) -> Arc<TokenBucket> {
        let now = self.clock.now();
        let mut entries = self.lock();

        if let Some(entry) = entries.get_mut(key) {
            entry.last_seen = now;
            return Arc::clone(&entry.bucket);
        }

        let bucket = Arc::new(TokenBucket::from_validated(self.limit, Arc::clone(&self.clock)));
        entries.insert(
            key.to_owned(),
            ScopedEntry {
                bucket: Arc::clone(&bucket),
                last_seen: now,
            },
        );
        bucket
    }

    /// Removes every entry not seen for longer than `idle_timeout`.
    /// Returns the number of evicted entries.
    pub fn evict_idle(&self, idle_timeout: Duration) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
        before - entries.len()
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `key` currently has a bucket
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Tier name used in logs
    pub fn tier(&self) -> &str {
        &self.tier
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ScopedEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
