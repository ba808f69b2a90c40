//! Queries for the users table and profile views.

use conduit_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::util::map_sqlite_err;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub image: Option<String>,
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub bio: &'a str,
    pub image: Option<&'a str>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.image.is_none()
            && self.password_hash.is_none()
    }
}

/// A user as seen by another (possibly anonymous) user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    pub following: bool,
}

const USER_COLUMNS: &str =
    "id, username, email, bio, image, password_hash, created_at, updated_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        bio: row.get(3)?,
        image: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Insert a user. Returns the new row id. Duplicate username or email
/// surfaces as `StorageError::ConstraintViolation`.
pub fn insert_user(conn: &Connection, user: &NewUser<'_>, now: i64) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO users (username, email, bio, image, password_hash, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            user.username,
            user.email,
            user.bio,
            user.image,
            user.password_hash,
            now
        ])
    })
    .map_err(map_sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

fn get_user_where(
    conn: &Connection,
    column: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<UserRow>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(map_sqlite_err)?;
    stmt.query_row([value], row_to_user)
        .optional()
        .map_err(map_sqlite_err)
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>, StorageError> {
    get_user_where(conn, "id", &id)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, StorageError> {
    get_user_where(conn, "email", &email)
}

pub fn get_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<UserRow>, StorageError> {
    get_user_where(conn, "username", &username)
}

/// Apply a partial update. Returns false if the user does not exist.
pub fn update_user(
    conn: &Connection,
    id: i64,
    changes: &UserChanges,
    now: i64,
) -> Result<bool, StorageError> {
    let updated = conn
        .prepare_cached(
            "UPDATE users SET
                username = COALESCE(?1, username),
                email = COALESCE(?2, email),
                bio = COALESCE(?3, bio),
                image = COALESCE(?4, image),
                password_hash = COALESCE(?5, password_hash),
                updated_at = ?6
             WHERE id = ?7",
        )
        .and_then(|mut stmt| {
            stmt.execute(params![
                changes.username,
                changes.email,
                changes.bio,
                changes.image,
                changes.password_hash,
                now,
                id
            ])
        })
        .map_err(map_sqlite_err)?;
    Ok(updated > 0)
}

/// Look up a profile by username. `following` is relative to `viewer`
/// and is always false for anonymous viewers.
pub fn get_profile(
    conn: &Connection,
    username: &str,
    viewer: Option<i64>,
) -> Result<Option<ProfileView>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT u.username, u.bio, u.image,
                    EXISTS(SELECT 1 FROM follows f
                           WHERE f.follower_id = ?2 AND f.followee_id = u.id)
             FROM users u WHERE u.username = ?1",
        )
        .map_err(map_sqlite_err)?;
    stmt.query_row(params![username, viewer], |row| {
        Ok(ProfileView {
            username: row.get(0)?,
            bio: row.get(1)?,
            image: row.get(2)?,
            following: row.get(3)?,
        })
    })
    .optional()
    .map_err(map_sqlite_err)
}

pub fn count_users(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(map_sqlite_err)
}
