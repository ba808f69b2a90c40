//! Shared helpers for query modules.

use conduit_core::errors::StorageError;
use rusqlite::ErrorCode;

/// Map a rusqlite error, keeping constraint failures and lock contention
/// distinguishable from other SQLite errors.
pub fn map_sqlite_err(e: rusqlite::Error) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
            StorageError::ConstraintViolation {
                message: msg.clone().unwrap_or_else(|| e.to_string()),
            }
        }
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            StorageError::Busy
        }
        _ => StorageError::SqliteError {
            message: e.to_string(),
        },
    }
}

/// Current wall-clock time as unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
