//! Error handling for Conduit.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod auth_error;
pub mod config_error;
pub mod error_code;
pub mod storage_error;
pub mod validation_error;

pub use auth_error::AuthError;
pub use config_error::ConfigError;
pub use error_code::ConduitErrorCode;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;
