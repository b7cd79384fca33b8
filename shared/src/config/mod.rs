//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Credential verification and cookie configuration
//! - `rate_limit` - Global, per-client and per-route token bucket tiers
//! - `server` - HTTP listener configuration

pub mod auth;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use rate_limit::{RateLimitConfig, TierLimit};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Every section is validated before returning, so a successfully
    /// loaded configuration can always build a gate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            server: ServerConfig::from_lookup(&lookup)?,
            auth: AuthConfig::from_lookup(&lookup)?,
            rate_limit: RateLimitConfig::from_lookup(&lookup)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.rate_limit.validate()
    }
}

/// Parse an optional variable, falling back to `default` when unset or blank
pub(crate) fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            })
        }
        _ => Ok(default),
    }
}
