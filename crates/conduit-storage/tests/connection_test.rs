//! Tests for DatabaseManager, pragmas, transactions and migrations.

use conduit_core::config::DatabaseConfig;
use conduit_core::errors::StorageError;
use conduit_storage::connection::pragmas::verify_wal_mode;
use conduit_storage::connection::writer::with_immediate_transaction;
use conduit_storage::migrations::{current_version, run_migrations, LATEST_VERSION};
use conduit_storage::queries::users::{self, NewUser};
use conduit_storage::DatabaseManager;
use rusqlite::Connection;
use tempfile::TempDir;

fn new_user<'a>(username: &'a str, email: &'a str) -> NewUser<'a> {
    NewUser {
        username,
        email,
        password_hash: "hash",
        bio: "",
        image: None,
    }
}

#[test]
fn file_backed_open_applies_wal_and_migrations() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("conduit.db");
    let db = DatabaseManager::open(&db_path).unwrap();

    assert_eq!(db.path(), Some(db_path.as_path()));
    assert_eq!(db.reader_count(), 4);

    db.with_writer(|conn| {
        assert!(verify_wal_mode(conn)?);
        assert_eq!(current_version(conn)?, LATEST_VERSION);
        Ok(())
    })
    .unwrap();
}

#[test]
fn reader_sees_committed_writes() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("conduit.db")).unwrap();

    let id = db
        .with_writer(|conn| users::insert_user(conn, &new_user("alice", "alice@example.com"), 1))
        .unwrap();

    // Round-robin: every reader must observe the row.
    for _ in 0..db.reader_count() {
        let found = db.with_reader(|conn| users::get_user_by_id(conn, id)).unwrap();
        assert_eq!(found.unwrap().username, "alice");
    }
}

#[test]
fn read_connections_reject_writes() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("conduit.db")).unwrap();

    let result = db.with_reader(|conn| users::insert_user(conn, &new_user("bob", "bob@example.com"), 1));
    assert!(result.is_err());
}

#[test]
fn open_with_respects_pool_size() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        read_pool_size: Some(2),
        busy_timeout_ms: Some(1000),
        ..Default::default()
    };
    let db = DatabaseManager::open_with(&dir.path().join("conduit.db"), &config).unwrap();
    assert_eq!(db.reader_count(), 2);
    db.checkpoint().unwrap();
}

#[test]
fn in_memory_routes_reads_through_writer() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert_eq!(db.path(), None);
    assert_eq!(db.reader_count(), 0);

    db.with_writer(|conn| users::insert_user(conn, &new_user("carol", "carol@example.com"), 1))
        .unwrap();
    let count = db.with_reader(users::count_users).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn reopen_keeps_data_and_skips_applied_migrations() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("conduit.db");

    {
        let db = DatabaseManager::open(&db_path).unwrap();
        db.with_writer(|conn| users::insert_user(conn, &new_user("dave", "dave@example.com"), 1))
            .unwrap();
    }

    let db = DatabaseManager::open(&db_path).unwrap();
    let found = db
        .with_reader(|conn| users::get_user_by_username(conn, "dave"))
        .unwrap();
    assert!(found.is_some());
}

#[test]
fn migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn immediate_transaction_commits_on_ok() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_writer(|conn| {
        with_immediate_transaction(conn, |tx| {
            users::insert_user(tx, &new_user("erin", "erin@example.com"), 1)?;
            users::insert_user(tx, &new_user("frank", "frank@example.com"), 1)?;
            Ok(())
        })
    })
    .unwrap();

    assert_eq!(db.with_reader(users::count_users).unwrap(), 2);
}

#[test]
fn immediate_transaction_rolls_back_on_err() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let result = db.with_writer(|conn| {
        with_immediate_transaction(conn, |tx| {
            users::insert_user(tx, &new_user("gina", "gina@example.com"), 1)?;
            // duplicate email
            users::insert_user(tx, &new_user("gina2", "gina@example.com"), 1)?;
            Ok(())
        })
    });

    assert!(matches!(result, Err(StorageError::ConstraintViolation { .. })));
    assert_eq!(db.with_reader(users::count_users).unwrap(), 0);

    // The writer is usable again after the rollback.
    db.with_writer(|conn| users::insert_user(conn, &new_user("gina", "gina@example.com"), 2))
        .unwrap();
}

#[test]
fn foreign_keys_are_enforced() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let result = db.with_writer(|conn| {
        conduit_storage::queries::follows::follow(conn, 41, 42, 1)
    });
    assert!(matches!(result, Err(StorageError::ConstraintViolation { .. })));
}
