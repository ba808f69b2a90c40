//! Error codes and messages.

use conduit_core::errors::{
    AuthError, ConduitErrorCode, ConfigError, StorageError, ValidationError,
};

#[test]
fn storage_error_codes() {
    let err = StorageError::ConstraintViolation {
        message: "UNIQUE constraint failed: users.email".to_string(),
    };
    assert_eq!(err.error_code(), "CONSTRAINT_VIOLATION");
    assert!(err.is_constraint_violation());
    assert_eq!(err.to_string(), "UNIQUE constraint failed: users.email");

    let err = StorageError::MigrationFailed {
        version: 2,
        message: "boom".to_string(),
    };
    assert_eq!(err.error_code(), "MIGRATION_FAILED");
    assert!(!err.is_constraint_violation());

    assert_eq!(StorageError::Busy.error_code(), "DB_BUSY");
    assert_eq!(
        StorageError::SqliteError { message: "x".into() }.log_string(),
        "[STORAGE_ERROR] SQLite error: x"
    );
}

#[test]
fn auth_error_client_vs_server() {
    assert!(AuthError::MissingToken.is_client_error());
    assert!(AuthError::InvalidToken { reason: "expired".into() }.is_client_error());
    assert!(AuthError::EmptyPassword.is_client_error());
    assert!(!AuthError::HashFailed { message: "x".into() }.is_client_error());

    assert_eq!(AuthError::EmptyPassword.to_string(), "password should not be empty!");
    assert_eq!(AuthError::MissingToken.error_code(), "UNAUTHORIZED");
}

#[test]
fn config_error_code() {
    let err = ConfigError::FileNotFound { path: "conduit.toml".into() };
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("conduit.toml"));
}

#[test]
fn validation_error_keeps_first_message_per_field() {
    let mut err = ValidationError::new();
    assert!(err.is_empty());

    err.add("Password", "{min: 8}");
    err.add("Password", "{key: required}");
    err.add("Email", "{key: email}");

    assert_eq!(err.len(), 2);
    assert_eq!(err.get("Password"), Some("{min: 8}"));
    assert_eq!(err.get("Email"), Some("{key: email}"));
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    assert!(err.clone().into_result().is_err());
    assert!(ValidationError::new().into_result().is_ok());
}

#[test]
fn validation_error_display_lists_fields_in_order() {
    let mut err = ValidationError::new();
    err.add("Password", "{min: 8}");
    err.add("Email", "{key: email}");

    assert_eq!(
        err.to_string(),
        "validation failed: Email={key: email} Password={min: 8}"
    );
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert!(boxed.source().is_none());
}
