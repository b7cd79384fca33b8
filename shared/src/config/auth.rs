//! Authentication configuration

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// JWT verification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC secret used to sign and verify credentials
    pub secret: String,

    /// Lifetime of issued tokens in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_seconds: default_token_ttl(),
        }
    }

    /// Set token lifetime in days
    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.token_ttl_seconds = days * 86400;
        self
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Name of the cookie carrying the bearer credential
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// JSON file seeding the identity directory; empty directory when unset
    #[serde(default)]
    pub identity_file: Option<String>,
}

impl AuthConfig {
    /// Create with the given secret and the default cookie name
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt: JwtConfig::new(secret),
            cookie_name: default_cookie_name(),
            identity_file: None,
        }
    }

    /// Create from environment-style variables. `JWT_SECRET` is mandatory.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingValue {
                name: "JWT_SECRET".to_string(),
            })?;
        let cookie_name = lookup("AUTH_COOKIE_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_cookie_name);
        let identity_file = lookup("IDENTITY_FILE").filter(|s| !s.trim().is_empty());

        Ok(Self {
            jwt: JwtConfig {
                secret,
                token_ttl_seconds: super::parse_or(lookup, "JWT_TOKEN_TTL_SECONDS", default_token_ttl())?,
            },
            cookie_name,
            identity_file,
        })
    }

    /// Validate the secret and cookie name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::MissingValue {
                name: "JWT_SECRET".to_string(),
            });
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                name: "AUTH_COOKIE_NAME".to_string(),
            });
        }
        if self.jwt.token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidDuration {
                field: "token_ttl_seconds".to_string(),
            });
        }
        Ok(())
    }

    /// Get JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }
}

fn default_token_ttl() -> i64 {
    2_592_000 // 30 days
}

fn default_cookie_name() -> String {
    String::from("Authorization")
}
