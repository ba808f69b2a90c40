//! Token and password hashing configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BCRYPT_COST, DEFAULT_JWT_SECRET, DEFAULT_TOKEN_TTL_HOURS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours. Default: 24.
    pub token_ttl_hours: Option<u64>,
    /// bcrypt work factor. Default: 10.
    pub bcrypt_cost: Option<u32>,
}

impl AuthConfig {
    pub fn effective_jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEFAULT_JWT_SECRET)
    }

    pub fn effective_token_ttl_hours(&self) -> u64 {
        self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
    }

    pub fn effective_bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }
}
