//! Gate services evaluated for every inbound request.

pub mod auth;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthGate, RoleGate};
pub use rate_limit::{
    normalize_client_key, Clock, Decision, IdleSweeper, ManualClock, RateGate,
    ScopedLimiterRegistry, SweeperHandle, SystemClock, Tier, TokenBucket, UNKNOWN_CLIENT_KEY,
};
pub use token::{TokenIssuer, TokenValidator};
