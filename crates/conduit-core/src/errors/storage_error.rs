//! Storage errors.

use super::error_code::{self, ConduitErrorCode};

/// Errors raised by the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    /// UNIQUE / FOREIGN KEY / NOT NULL failures. Surfaced to clients as 422.
    #[error("{message}")]
    ConstraintViolation { message: String },

    #[error("Database busy")]
    Busy,

    #[error("Connection lock poisoned: {which}")]
    LockPoisoned { which: &'static str },
}

impl StorageError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

impl ConduitErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::ConstraintViolation { .. } => error_code::CONSTRAINT_VIOLATION,
            Self::Busy => error_code::DB_BUSY,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
