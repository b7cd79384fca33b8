//! Response bodies of the HTTP surface

use sentinel_core::domain::entities::Principal;
use serde::{Deserialize, Serialize};

/// Body carrying a single message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by the profile endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: Principal,
}
