//! ConduitErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait ConduitErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted log string: `[ERROR_CODE] message`.
    fn log_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const PASSWORD_ERROR: &str = "PASSWORD_ERROR";
pub const TOKEN_ERROR: &str = "TOKEN_ERROR";
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
