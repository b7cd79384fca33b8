//! Unit tests for three-tier admission

use std::sync::Arc;
use std::time::Duration;

use sentinel_shared::{ConfigError, RateLimitConfig, TierLimit};

use crate::errors::GateError;
use crate::services::rate_limit::{
    normalize_client_key, Clock, Decision, ManualClock, RateGate, Tier, UNKNOWN_CLIENT_KEY,
};

fn gate(global: TierLimit, client: TierLimit, route: TierLimit) -> (RateGate, ManualClock) {
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let config = RateLimitConfig::with_tiers(global, client, route);
    (RateGate::with_clock(&config, shared).unwrap(), clock)
}

fn wide() -> TierLimit {
    TierLimit::new(100.0, 100)
}

fn tight() -> TierLimit {
    TierLimit::new(1.0, 1)
}

fn rejected_tier(decision: Decision) -> Option<Tier> {
    match decision {
        Decision::Allow => None,
        Decision::Rejected { tier, .. } => Some(tier),
    }
}

#[test]
fn test_global_limit() {
    let (gate, _clock) = gate(tight(), wide(), wide());

    assert!(gate.admit("1.1.1.1", "/test").is_allowed());
    assert_eq!(rejected_tier(gate.admit("1.1.1.1", "/test")), Some(Tier::Global));
    // Any client, any route
    assert_eq!(rejected_tier(gate.admit("9.9.9.9", "/other")), Some(Tier::Global));
}

#[test]
fn test_client_isolation() {
    let (gate, _clock) = gate(wide(), tight(), wide());

    assert!(gate.admit("2.2.2.2", "/test").is_allowed());
    assert_eq!(rejected_tier(gate.admit("2.2.2.2", "/test")), Some(Tier::Client));
    assert!(gate.admit("3.3.3.3", "/test").is_allowed());
}

#[test]
fn test_route_isolation() {
    let (gate, _clock) = gate(wide(), wide(), tight());

    assert!(gate.admit("4.4.4.4", "/a").is_allowed());
    assert_eq!(rejected_tier(gate.admit("4.4.4.4", "/a")), Some(Tier::Route));
    assert_eq!(rejected_tier(gate.admit("5.5.5.5", "/a")), Some(Tier::Route));
    assert!(gate.admit("4.4.4.4", "/b").is_allowed());
}

#[test]
fn test_burst_then_reject() {
    let (gate, _clock) = gate(TierLimit::new(1.0, 3), wide(), wide());

    for _ in 0..3 {
        assert!(gate.admit("5.5.5.5", "/test").is_allowed());
    }
    assert_eq!(rejected_tier(gate.admit("5.5.5.5", "/test")), Some(Tier::Global));
}

#[test]
fn test_limiter_recovers_after_refill() {
    let (gate, clock) = gate(tight(), tight(), tight());

    assert!(gate.admit("6.6.6.6", "/test").is_allowed());
    assert!(!gate.admit("6.6.6.6", "/test").is_allowed());

    clock.advance(Duration::from_millis(1100));
    assert!(gate.admit("6.6.6.6", "/test").is_allowed());
}

#[test]
fn test_rapid_requests_against_single_token_limiter() {
    let (gate, _clock) = gate(tight(), tight(), tight());

    let admitted = (0..101)
        .filter(|_| gate.admit("7.7.7.7", "/test").is_allowed())
        .count();
    assert_eq!(admitted, 1);
}

#[test]
fn test_rejected_request_leaves_later_tiers_untouched() {
    let (gate, _clock) = gate(wide(), tight(), TierLimit::new(1.0, 5));

    assert!(gate.admit("8.8.8.8", "/r").is_allowed());
    let route_tokens = gate.route_registry().get_or_create("/r").available_tokens();
    assert_eq!(route_tokens, 4.0);

    // Rejected at the client tier: the route bucket keeps its tokens
    for _ in 0..5 {
        assert_eq!(rejected_tier(gate.admit("8.8.8.8", "/r")), Some(Tier::Client));
    }
    assert_eq!(gate.route_registry().get_or_create("/r").available_tokens(), 4.0);
}

#[test]
fn test_global_rejection_creates_no_scoped_entries() {
    let (gate, _clock) = gate(tight(), wide(), wide());
    assert!(gate.admit("1.1.1.1", "/a").is_allowed());

    assert!(!gate.admit("2.2.2.2", "/b").is_allowed());
    assert!(!gate.client_registry().contains("2.2.2.2"));
    assert!(!gate.route_registry().contains("/b"));
}

#[test]
fn test_admission_spends_one_token_per_tier() {
    let (gate, _clock) = gate(TierLimit::new(1.0, 10), TierLimit::new(1.0, 10), TierLimit::new(1.0, 10));

    assert!(gate.admit("1.2.3.4", "/x").is_allowed());

    assert_eq!(gate.global_bucket().available_tokens(), 9.0);
    assert_eq!(gate.client_registry().get_or_create("1.2.3.4").available_tokens(), 9.0);
    assert_eq!(gate.route_registry().get_or_create("/x").available_tokens(), 9.0);
}

#[test]
fn test_forced_sweep_evicts_idle_clients_and_routes() {
    let (gate, clock) = gate(wide(), wide(), wide());
    gate.admit("1.1.1.1", "/a");

    clock.advance(Duration::from_secs(601));
    gate.admit("2.2.2.2", "/b");

    assert_eq!(gate.sweep_idle(), 2);
    assert!(!gate.client_registry().contains("1.1.1.1"));
    assert!(gate.client_registry().contains("2.2.2.2"));
    assert!(!gate.route_registry().contains("/a"));
    assert!(gate.route_registry().contains("/b"));
}

#[test]
fn test_unmatched_paths_do_not_accumulate() {
    let (gate, clock) = gate(wide(), wide(), wide());
    for i in 0..500 {
        gate.admit("192.0.2.1", &format!("/no-such-route/{}", i));
    }
    assert_eq!(gate.route_registry().len(), 500);

    clock.advance(Duration::from_secs(3600));

    assert_eq!(gate.sweep_idle(), 501);
    assert!(gate.route_registry().is_empty());
    assert!(gate.client_registry().is_empty());
}

#[test]
fn test_rejection_converts_to_gate_error() {
    let (gate, _clock) = gate(tight(), wide(), wide());
    assert_eq!(gate.admit("1.1.1.1", "/").into_result(), Ok(()));

    match gate.admit("1.1.1.1", "/").into_result() {
        Err(GateError::RateLimitExceeded { tier, retry_after }) => {
            assert_eq!(tier, Tier::Global);
            assert_eq!(retry_after, Duration::from_secs(1));
        }
        other => panic!("expected rate limit rejection, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_fails_construction() {
    let config = RateLimitConfig::with_tiers(wide(), TierLimit::new(0.0, 1), wide());
    let err = RateGate::new(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRate { tier, .. } if tier == "client"));

    let config = RateLimitConfig::with_tiers(wide(), wide(), TierLimit::new(1.0, 0));
    assert!(matches!(RateGate::new(&config), Err(ConfigError::InvalidBurst { .. })));
}

#[test]
fn test_normalize_client_key() {
    assert_eq!(normalize_client_key("192.168.0.1"), "192.168.0.1");
    assert_eq!(normalize_client_key(" 192.168.0.1 "), "192.168.0.1");
    assert_eq!(normalize_client_key("192.168.0.1:8080"), "192.168.0.1");
    assert_eq!(normalize_client_key("2001:0db8:0000:0000:0000:0000:0000:0001"), "2001:db8::1");
    assert_eq!(normalize_client_key("[::1]:443"), "::1");
    assert_eq!(normalize_client_key("::ffff:10.0.0.1"), "10.0.0.1");
    assert_eq!(normalize_client_key("not-an-ip"), UNKNOWN_CLIENT_KEY);
    assert_eq!(normalize_client_key(""), UNKNOWN_CLIENT_KEY);
}

#[test]
fn test_unparsable_clients_share_one_bucket() {
    let (gate, _clock) = gate(wide(), tight(), wide());

    assert!(gate.admit(&normalize_client_key("garbage"), "/").is_allowed());
    assert_eq!(
        rejected_tier(gate.admit(&normalize_client_key("other-garbage"), "/")),
        Some(Tier::Client)
    );
}
