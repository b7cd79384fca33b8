//! Shared configuration and response types for the Sentinel gate
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (rate limits, authentication, server)
//! - Configuration errors
//! - The JSON error body returned by every gate rejection

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, JwtConfig, RateLimitConfig, ServerConfig, TierLimit};
pub use errors::{error_codes, ConfigError, ErrorResponse};
