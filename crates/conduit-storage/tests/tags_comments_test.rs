//! Tests for tag links and comments.

use conduit_storage::migrations::run_migrations;
use conduit_storage::queries::articles::{insert_article, NewArticle};
use conduit_storage::queries::comments::*;
use conduit_storage::queries::follows::follow;
use conduit_storage::queries::tags::*;
use conduit_storage::queries::users::{insert_user, NewUser};
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
            password_hash: "h",
            bio: "bio",
            image: Some("https://example.com/a.png"),
        },
        0,
    )
    .unwrap()
}

fn add_article(conn: &Connection, author_id: i64, title: &str) -> i64 {
    insert_article(
        conn,
        &NewArticle {
            title,
            description: "",
            body: "",
            author_id,
        },
        0,
    )
    .unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn set_article_tags_dedupes_and_skips_empties() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let id = add_article(&conn, alice, "Tagged");

    set_article_tags(&conn, id, &strings(&["rust", "", "  ", "rust", " web "])).unwrap();
    assert_eq!(tags_for_article(&conn, id).unwrap(), vec!["rust", "web"]);
}

#[test]
fn set_article_tags_replaces_links_and_reuses_tags() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let first = add_article(&conn, alice, "First");
    let second = add_article(&conn, alice, "Second");

    set_article_tags(&conn, first, &strings(&["a", "b"])).unwrap();
    set_article_tags(&conn, second, &strings(&["b", "c"])).unwrap();
    set_article_tags(&conn, first, &strings(&["c"])).unwrap();

    assert_eq!(tags_for_article(&conn, first).unwrap(), vec!["c"]);
    assert_eq!(tags_for_article(&conn, second).unwrap(), vec!["b", "c"]);
    assert_eq!(all_tags(&conn).unwrap(), vec!["a", "b", "c"]);

    let batch = tags_for_articles(&conn, &[first, second, 999]).unwrap();
    assert_eq!(batch[&first], vec!["c"]);
    assert_eq!(batch[&second], vec!["b", "c"]);
    assert!(!batch.contains_key(&999));
    assert!(tags_for_articles(&conn, &[]).unwrap().is_empty());
}

#[test]
fn comments_roundtrip_with_author_profiles() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let bob = add_user(&conn, "bob");
    let article = add_article(&conn, alice, "Discussed");

    let c1 = insert_comment(&conn, article, bob, "first!", 10).unwrap();
    let c2 = insert_comment(&conn, article, alice, "thanks", 20).unwrap();

    let row = get_comment(&conn, c1).unwrap().unwrap();
    assert_eq!(row.article_id, article);
    assert_eq!(row.author_id, bob);
    assert_eq!(row.body, "first!");
    assert_eq!(row.created_at, 10);

    follow(&conn, alice, bob, 1).unwrap();
    let list = comments_for_article(&conn, article, Some(alice)).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].comment.id, c1);
    assert_eq!(list[0].author.username, "bob");
    assert!(list[0].author.following);
    assert_eq!(list[1].comment.id, c2);
    assert!(!list[1].author.following);
    assert_eq!(list[1].author.image.as_deref(), Some("https://example.com/a.png"));

    let single = view_comment(&conn, c2, None).unwrap().unwrap();
    assert_eq!(single.comment.body, "thanks");
    assert!(view_comment(&conn, 999, None).unwrap().is_none());
}

#[test]
fn delete_comment_reports_removal() {
    let conn = setup_db();
    let alice = add_user(&conn, "alice");
    let article = add_article(&conn, alice, "Short lived");
    let id = insert_comment(&conn, article, alice, "bye", 1).unwrap();

    assert!(delete_comment(&conn, id).unwrap());
    assert!(!delete_comment(&conn, id).unwrap());
    assert!(get_comment(&conn, id).unwrap().is_none());
    assert!(comments_for_article(&conn, article, None).unwrap().is_empty());
}
