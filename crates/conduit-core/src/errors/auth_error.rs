//! Authentication errors: token issuing/verification and password hashing.

use super::error_code::{self, ConduitErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization token")]
    MissingToken,

    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("password should not be empty!")]
    EmptyPassword,

    #[error("password hashing failed: {message}")]
    HashFailed { message: String },

    #[error("token encoding failed: {message}")]
    TokenEncoding { message: String },
}

impl AuthError {
    /// Whether the error is the caller's fault (bad/missing credentials)
    /// rather than a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::InvalidToken { .. } | Self::EmptyPassword
        )
    }
}

impl ConduitErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken | Self::InvalidToken { .. } => error_code::UNAUTHORIZED,
            Self::EmptyPassword | Self::HashFailed { .. } => error_code::PASSWORD_ERROR,
            Self::TokenEncoding { .. } => error_code::TOKEN_ERROR,
        }
    }
}
