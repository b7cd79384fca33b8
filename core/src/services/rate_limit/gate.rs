//! Three-tier admission: global, then per-client, then per-route.
//!
//! Tiers are evaluated in that order and the first rejection ends the
//! evaluation. Tiers after the rejecting one are not touched, so a rejected
//! request spends tokens only from the tiers it passed.
//!
//! Under concurrency two requests may both observe the last token of a
//! bucket window and the nominal rate can be exceeded briefly. Tokens spent
//! by a request that is later abandoned are not returned.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use sentinel_shared::{ConfigError, RateLimitConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::registry::ScopedLimiterRegistry;
use super::sweeper::{IdleSweeper, SweeperHandle};
use super::token_bucket::TokenBucket;
use crate::errors::GateError;

/// Shared key for clients whose address cannot be parsed
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// One independently configured rate limiting scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Global,
    Client,
    Route,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Global => "global",
            Tier::Client => "client",
            Tier::Route => "route",
        }
    }

    /// Message returned to the caller when this tier rejects
    pub fn rejection_message(&self) -> &'static str {
        match self {
            Tier::Global => "global rate limit exceeded",
            Tier::Client => "too many requests from this IP",
            Tier::Route => "route rate limit exceeded",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a rate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Rejected { tier: Tier, retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts a rejection into the gate error taxonomy
    pub fn into_result(self) -> Result<(), GateError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Rejected { tier, retry_after } => {
                Err(GateError::RateLimitExceeded { tier, retry_after })
            }
        }
    }
}

/// Owns the global bucket and the client and route registries.
///
/// Both registries are swept for idle entries: route keys fall back to the
/// raw path for unmatched requests, so they are as unbounded as client keys.
#[derive(Debug)]
pub struct RateGate {
    global: TokenBucket,
    clients: Arc<ScopedLimiterRegistry>,
    routes: Arc<ScopedLimiterRegistry>,
    idle_timeout: Duration,
    sweep_interval: Duration,
}

impl RateGate {
    /// Builds the gate on the system clock. Fails on any invalid tier.
    pub fn new(config: &RateLimitConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds the gate on a caller-supplied clock
    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            global: TokenBucket::from_validated(config.global, Arc::clone(&clock)),
            clients: Arc::new(ScopedLimiterRegistry::new(
                Tier::Client.as_str(),
                config.client,
                Arc::clone(&clock),
            )?),
            routes: Arc::new(ScopedLimiterRegistry::new(
                Tier::Route.as_str(),
                config.route,
                clock,
            )?),
            idle_timeout: config.idle_timeout(),
            sweep_interval: config.sweep_interval(),
        })
    }

    /// Decides whether a request from `client_key` to `route_key` is admitted
    pub fn admit(&self, client_key: &str, route_key: &str) -> Decision {
        if let Err(retry_after) = self.global.try_acquire() {
            debug!(tier = "global", "Rate limit exceeded");
            return Decision::Rejected {
                tier: Tier::Global,
                retry_after,
            };
        }

        if let Err(retry_after) = self.clients.get_or_create(client_key).try_acquire() {
            debug!(tier = "client", client = %client_key, "Rate limit exceeded");
            return Decision::Rejected {
                tier: Tier::Client,
                retry_after,
            };
        }

        if let Err(retry_after) = self.routes.get_or_create(route_key).try_acquire() {
            debug!(tier = "route", route = %route_key, "Rate limit exceeded");
            return Decision::Rejected {
                tier: Tier::Route,
                retry_after,
            };
        }

        Decision::Allow
    }

    /// Evicts idle client and route buckets once, outside the periodic
    /// schedule. Returns the total number of evicted entries.
    pub fn sweep_idle(&self) -> usize {
        self.clients.evict_idle(self.idle_timeout) + self.routes.evict_idle(self.idle_timeout)
    }

    /// Starts the periodic sweep of both registries. Must be called within a
    /// tokio runtime.
    pub fn start_sweeper(&self) -> Result<SweeperHandle, ConfigError> {
        IdleSweeper::start(
            vec![Arc::clone(&self.clients), Arc::clone(&self.routes)],
            self.sweep_interval,
            self.idle_timeout,
        )
    }

    pub fn global_bucket(&self) -> &TokenBucket {
        &self.global
    }

    pub fn client_registry(&self) -> &ScopedLimiterRegistry {
        &self.clients
    }

    pub fn route_registry(&self) -> &ScopedLimiterRegistry {
        &self.routes
    }
}

/// Canonical client key for an address string.
///
/// Accepts a bare IP or an `ip:port` socket address. Anything unparsable
/// maps to [`UNKNOWN_CLIENT_KEY`], grouping unattributable clients into one
/// shared bucket instead of rejecting them.
pub fn normalize_client_key(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(ip) = raw.parse::<IpAddr>() {
        return canonical_ip(ip).to_string();
    }
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return canonical_ip(addr.ip()).to_string();
    }
    UNKNOWN_CLIENT_KEY.to_string()
}

// IPv4-mapped IPv6 addresses share the bucket of the plain IPv4 address
fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}
