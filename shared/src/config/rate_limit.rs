//! Rate limiting configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::parse_or;
use crate::errors::ConfigError;

/// Limits for a single token bucket tier
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TierLimit {
    /// Sustained refill rate in tokens per second
    pub rps: f64,

    /// Bucket capacity (maximum burst)
    pub burst: u32,
}

impl TierLimit {
    /// Create a new tier limit
    pub fn new(rps: f64, burst: u32) -> Self {
        Self { rps, burst }
    }

    /// Validate the limit, naming the tier in the error
    pub fn validate(&self, tier: &str) -> Result<(), ConfigError> {
        if !self.rps.is_finite() || self.rps <= 0.0 {
            return Err(ConfigError::InvalidRate {
                tier: tier.to_string(),
                value: self.rps,
            });
        }
        if self.burst == 0 {
            return Err(ConfigError::InvalidBurst {
                tier: tier.to_string(),
            });
        }
        Ok(())
    }
}

/// Upper bound for the idle timeout and the sweep interval (one week)
pub const MAX_EVICTION_SECS: u64 = 7 * 24 * 60 * 60;

/// Rate limiting configuration for the three admission tiers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Service-wide bucket shared by every request
    #[serde(default = "default_global")]
    pub global: TierLimit,

    /// Bucket per client address
    #[serde(default = "default_client")]
    pub client: TierLimit,

    /// Bucket per route template
    #[serde(default = "default_route")]
    pub route: TierLimit,

    /// Idle time after which a client or route bucket is evicted, in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Interval between idle sweeps, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Use X-Forwarded-For / X-Real-IP to identify clients.
    /// Only enable behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global: default_global(),
            client: default_client(),
            route: default_route(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            trust_forwarded_headers: false,
        }
    }
}

impl RateLimitConfig {
    /// Build a configuration with the given tier limits and default eviction settings
    pub fn with_tiers(global: TierLimit, client: TierLimit, route: TierLimit) -> Self {
        Self {
            global,
            client,
            route,
            ..Default::default()
        }
    }

    /// Create from environment-style variables
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            global: TierLimit {
                rps: parse_or(lookup, "RATE_LIMIT_GLOBAL_RPS", defaults.global.rps)?,
                burst: parse_or(lookup, "RATE_LIMIT_GLOBAL_BURST", defaults.global.burst)?,
            },
            client: TierLimit {
                rps: parse_or(lookup, "RATE_LIMIT_CLIENT_RPS", defaults.client.rps)?,
                burst: parse_or(lookup, "RATE_LIMIT_CLIENT_BURST", defaults.client.burst)?,
            },
            route: TierLimit {
                rps: parse_or(lookup, "RATE_LIMIT_ROUTE_RPS", defaults.route.rps)?,
                burst: parse_or(lookup, "RATE_LIMIT_ROUTE_BURST", defaults.route.burst)?,
            },
            idle_timeout_secs: parse_or(
                lookup,
                "RATE_LIMIT_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            )?,
            sweep_interval_secs: parse_or(
                lookup,
                "RATE_LIMIT_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )?,
            trust_forwarded_headers: parse_or(
                lookup,
                "RATE_LIMIT_TRUST_FORWARDED",
                defaults.trust_forwarded_headers,
            )?,
        })
    }

    /// Validate all tiers and eviction settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.global.validate("global")?;
        self.client.validate("client")?;
        self.route.validate("route")?;
        check_eviction_secs("idle_timeout_secs", self.idle_timeout_secs)?;
        check_eviction_secs("sweep_interval_secs", self.sweep_interval_secs)
    }

    /// Idle threshold for scoped bucket eviction
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Interval between idle sweeps
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn check_eviction_secs(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidDuration {
            field: field.to_string(),
        });
    }
    if value > MAX_EVICTION_SECS {
        return Err(ConfigError::DurationTooLong {
            field: field.to_string(),
            max_secs: MAX_EVICTION_SECS,
        });
    }
    Ok(())
}

fn default_global() -> TierLimit {
    TierLimit::new(500.0, 1000)
}

fn default_client() -> TierLimit {
    TierLimit::new(20.0, 40)
}

fn default_route() -> TierLimit {
    TierLimit::new(100.0, 200)
}

fn default_idle_timeout() -> u64 {
    600 // 10 minutes
}

fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}
