//! Session route handlers
//!
//! Registration and login belong to the identity service; this binary only
//! ends sessions.

pub mod logout;

pub use logout::logout;
