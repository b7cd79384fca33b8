//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use chrono::Duration;
use sentinel_api::AppState;
use sentinel_core::domain::entities::{Principal, Role};
use sentinel_core::repositories::InMemoryIdentityResolver;
use sentinel_core::services::{AuthGate, Clock, ManualClock, RateGate, TokenIssuer, TokenValidator};
use sentinel_shared::{RateLimitConfig, TierLimit};

pub const SECRET: &str = "integration-test-secret";
pub const COOKIE: &str = "Authorization";
pub const ADMIN_ID: u64 = 1;
pub const USER_ID: u64 = 2;

/// Limits high enough that no test trips them by accident
pub fn relaxed_limits() -> RateLimitConfig {
    RateLimitConfig::with_tiers(
        TierLimit::new(1000.0, 1000),
        TierLimit::new(1000.0, 1000),
        TierLimit::new(1000.0, 1000),
    )
}

pub fn directory() -> InMemoryIdentityResolver {
    InMemoryIdentityResolver::with_principals([
        Principal::new(ADMIN_ID, Role::Admin),
        Principal::new(USER_ID, Role::User),
    ])
}

/// Application state over a manual clock and the default directory
pub fn state_with(config: &RateLimitConfig, resolver: InMemoryIdentityResolver) -> (AppState, ManualClock) {
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let rate_gate = Arc::new(RateGate::with_clock(config, shared).unwrap());
    let auth_gate = Arc::new(AuthGate::new(TokenValidator::new(SECRET), Arc::new(resolver)));
    (AppState::new(rate_gate, auth_gate, COOKIE), clock)
}

pub fn state(config: &RateLimitConfig) -> (AppState, ManualClock) {
    state_with(config, directory())
}

pub fn token_for(id: u64, role: Option<Role>) -> String {
    TokenIssuer::new(SECRET, Duration::hours(1))
        .issue(id, role, Duration::hours(1))
        .unwrap()
}

pub fn credential(token: String) -> Cookie<'static> {
    Cookie::new(COOKIE, token)
}

pub fn peer(ip: &str) -> SocketAddr {
    format!("{}:40000", ip).parse().unwrap()
}
