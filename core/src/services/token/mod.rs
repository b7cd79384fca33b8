//! Bearer credential handling
//!
//! This module handles:
//! - HMAC-signed JWT validation with algorithm pinning
//! - Subject extraction as a numeric user ID
//! - Token issuance with the shared secret

mod issuer;
mod validator;


pub use issuer::TokenIssuer;
pub use validator::{TokenValidator, ALLOWED_ALGORITHMS};
