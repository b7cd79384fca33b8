//! Rate limiting module
//!
//! This module handles request admission by token buckets:
//! - A single global bucket protecting the whole service
//! - Per-client buckets created on first sight and evicted when idle
//! - Per-route buckets keyed by route template
//! - A background sweeper owning the idle eviction schedule

mod clock;
mod gate;
mod registry;
mod sweeper;
mod token_bucket;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{normalize_client_key, Decision, RateGate, Tier, UNKNOWN_CLIENT_KEY};
pub use registry::ScopedLimiterRegistry;
pub use sweeper::{IdleSweeper, SweeperHandle};
pub use token_bucket::TokenBucket;
