//! Tests for user, profile and follow queries.

use conduit_core::errors::StorageError;
use conduit_storage::migrations::run_migrations;
use conduit_storage::queries::follows::*;
use conduit_storage::queries::users::*;
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn add_user(conn: &Connection, username: &str) -> i64 {
    let email = format!("{username}@example.com");
    insert_user(
        conn,
        &NewUser {
            username,
            email: &email,
            password_hash: "$2b$04$hash",
            bio: "",
            image: None,
        },
        1_700_000_000_000,
    )
    .unwrap()
}

#[test]
fn insert_and_lookup_by_each_key() {
    let conn = setup_db();
    let id = add_user(&conn, "alice");

    let by_id = get_user_by_id(&conn, id).unwrap().unwrap();
    let by_email = get_user_by_email(&conn, "alice@example.com").unwrap().unwrap();
    let by_name = get_user_by_username(&conn, "alice").unwrap().unwrap();

    assert_eq!(by_id, by_email);
    assert_eq!(by_id, by_name);
    assert_eq!(by_id.bio, "");
    assert_eq!(by_id.image, None);
    assert_eq!(by_id.created_at, 1_700_000_000_000);
    assert_eq!(by_id.updated_at, by_id.created_at);

    assert!(get_user_by_id(&conn, id + 100).unwrap().is_none());
    assert!(get_user_by_email(&conn, "nobody@example.com").unwrap().is_none());
}

#[test]
fn duplicate_username_or_email_is_constraint_violation() {
    let conn = setup_db();
    add_user(&conn, "alice");

    let dup_email = insert_user(
        &conn,
        &NewUser {
            username: "alice2",
            email: "alice@example.com",
            password_hash: "h",
            bio: "",
            image: None,
        },
        1,
    );
    assert!(matches!(dup_email, Err(StorageError::ConstraintViolation { .. })));

    let dup_name = insert_user(
        &conn,
        &NewUser {
            username: "alice",
            email: "other@example.com",
            password_hash: "h",
            bio: "",
            image: None,
        },
        1,
    );
    let err = dup_name.unwrap_err();
    assert!(err.is_constraint_violation());
    assert!(err.to_string().contains("users.username"));
}

#[test]
fn update_user_applies_only_provided_fields() {
    let conn = setup_db();
    let id = add_user(&conn, "alice");

    let changes = UserChanges {
        bio: Some("I like to skateboard".to_string()),
        image: Some("https://i.stack.imgur.com/xHWG8.jpg".to_string()),
        ..Default::default()
    };
    assert!(!changes.is_empty());
    assert!(update_user(&conn, id, &changes, 1_700_000_000_500).unwrap());

    let user = get_user_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.bio, "I like to skateboard");
    assert_eq!(user.image.as_deref(), Some("https://i.stack.imgur.com/xHWG8.jpg"));
    assert_eq!(user.password_hash, "$2b$04$hash");
    assert_eq!(user.updated_at, 1_700_000_000_500);

    assert!(!update_user(&conn, id + 1, &changes, 1).unwrap());
    assert!(UserChanges::default().is_empty());
}

#[test]
fn update_user_to_taken_email_fails() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    add_user(&conn, "bob");

    let changes = UserChanges {
        email: Some("bob@example.com".to_string()),
        ..Default::default()
    };
    let err = update_user(&conn, alice, &changes, 2).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn profile_following_is_relative_to_viewer() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let bob = add_user(&conn, "bob");

    let anon = get_profile(&conn, "bob", None).unwrap().unwrap();
    assert!(!anon.following);

    follow(&conn, alice, bob, 1).unwrap();
    assert!(get_profile(&conn, "bob", Some(alice)).unwrap().unwrap().following);
    assert!(!get_profile(&conn, "alice", Some(bob)).unwrap().unwrap().following);
    assert!(get_profile(&conn, "nobody", Some(alice)).unwrap().is_none());
}

#[test]
fn follow_is_idempotent_and_unfollow_tolerates_missing_edge() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let bob = add_user(&conn, "bob");
    let carol = add_user(&conn, "carol");

    follow(&conn, alice, bob, 1).unwrap();
    follow(&conn, alice, bob, 2).unwrap();
    follow(&conn, alice, carol, 3).unwrap();
    assert_eq!(following_ids(&conn, alice).unwrap(), vec![bob, carol]);
    assert!(is_following(&conn, alice, bob).unwrap());
    assert!(!is_following(&conn, bob, alice).unwrap());

    assert!(unfollow(&conn, alice, bob).unwrap());
    assert!(!unfollow(&conn, alice, bob).unwrap());
    assert_eq!(following_ids(&conn, alice).unwrap(), vec![carol]);
}

#[test]
fn self_follow_is_allowed() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    follow(&conn, alice, alice, 1).unwrap();
    assert!(get_profile(&conn, "alice", Some(alice)).unwrap().unwrap().following);
}

#[test]
fn count_users_counts_rows() {
    let conn = setup_db();
    assert_eq!(count_users(&conn).unwrap(), 0);
    add_user(&conn, "alice");
    add_user(&conn, "bob");
    assert_eq!(count_users(&conn).unwrap(), 2);
}
