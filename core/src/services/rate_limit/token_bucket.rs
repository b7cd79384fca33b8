//! Token bucket: the unit of admission control.
//!
//! The bucket starts full, refills lazily on every check at `rps` tokens per
//! second up to `burst`, and charges one token per admitted request. Refill
//! and spend happen under one mutex, so a bucket may be shared freely across
//! request threads. The check never blocks beyond that critical section.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sentinel_shared::{ConfigError, TierLimit};

use super::clock::Clock;

/// Absorbs float rounding when a wait of exactly `1/rps` is observed
const TOKEN_EPSILON: f64 = 1e-6;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// A refillable counter with a capacity and a refill rate
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
    clock: Arc<dyn Clock>,
}

impl TokenBucket {
    /// Creates a full bucket, rejecting non-positive rates and zero capacity
    pub fn new(limit: TierLimit, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        limit.validate("bucket")?;
        Ok(Self::from_validated(limit, clock))
    }

    /// Creates a full bucket from a limit that has already been validated
    pub(crate) fn from_validated(limit: TierLimit, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let capacity = f64::from(limit.burst);
        Self {
            capacity,
            refill_per_sec: limit.rps,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: now,
            }),
            clock,
        }
    }

    /// Spends one token if available
    pub fn allow(&self) -> bool {
        self.try_acquire().is_ok()
    }

    /// Spends one token, or returns how long until one will be available
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let now = self.clock.now();
        let mut state = self.lock();
        self.refill(&mut state, now);

        if state.tokens + TOKEN_EPSILON >= 1.0 {
            state.tokens = (state.tokens - 1.0).max(0.0);
            Ok(())
        } else {
            Err(self.time_until_token(state.tokens))
        }
    }

    /// Tokens currently available, including pending refill. Does not spend.
    pub fn available_tokens(&self) -> f64 {
        let now = self.clock.now();
        let state = self.lock();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        (state.tokens + elapsed * self.refill_per_sec).min(self.capacity)
    }

    /// Maximum number of tokens
    pub fn capacity(&self) -> u32 {
        self.capacity as u32
    }

    /// Refill rate in tokens per second
    pub fn refill_rate(&self) -> f64 {
        self.refill_per_sec
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        if now <= state.last_refill {
            return;
        }
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        state.last_refill = now;
    }

    fn time_until_token(&self, tokens: f64) -> Duration {
        let missing = (1.0 - tokens).max(0.0);
        let nanos = (missing / self.refill_per_sec * 1e9).ceil();
        Duration::from_nanos(nanos as u64)
    }

    fn lock(&self) -> MutexGuard<'_, BucketState> {
        // Every write leaves the state consistent, so a poisoned lock is safe to reuse
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_per_sec", &self.refill_per_sec)
            .finish_non_exhaustive()
    }
}
