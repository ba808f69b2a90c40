//! HS256 tokens carrying the user id.

use conduit_core::config::AuthConfig;
use conduit_core::errors::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Upper bound on token lifetime (100 years); keeps expiry arithmetic in range.
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Issues and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: chrono::Duration::hours(ttl_hours.min(MAX_TTL_HOURS) as i64),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.effective_jwt_secret(), config.effective_token_ttl_hours())
    }

    /// Issue a token for `user_id` expiring one TTL from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + self.ttl).timestamp();
        self.issue_with_expiry(user_id, exp)
    }

    /// Issue a token with an explicit expiry (unix seconds).
    pub fn issue_with_expiry(&self, user_id: i64, exp: i64) -> Result<String, AuthError> {
        let claims = Claims { id: user_id, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            AuthError::TokenEncoding {
                message: e.to_string(),
            }
        })
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken {
                reason: e.to_string(),
            })
    }
}
