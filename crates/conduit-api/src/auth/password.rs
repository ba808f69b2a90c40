//! bcrypt password hashing.

use conduit_core::errors::AuthError;

/// Hash `password` with the given bcrypt cost. Empty passwords are rejected.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::HashFailed {
        message: e.to_string(),
    })
}

/// Whether `password` matches `hash`. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
