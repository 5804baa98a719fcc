//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `username` and `api_token` are unique; duplicates surface as
//!   `RepoError::Conflict`.
//! - Password hashes are written once and never read back.

use crate::db::now_epoch_ms;
use crate::model::user::{User, UserId};
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

const REQUIRED_COLUMNS: &[&str] = &["id", "username", "password_hash", "api_token", "created_at"];

/// Repository interface for note owners.
pub trait UserRepository {
    /// Inserts a user; fails with `Conflict` when the username is taken.
    fn create_user(&self, username: &str, password_hash: &str, api_token: &str)
        -> RepoResult<User>;
    /// Finds the user that owns `api_token`.
    fn find_by_token(&self, api_token: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "users", REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        api_token: &str,
    ) -> RepoResult<User> {
        let result = self.conn.query_row(
            "INSERT INTO users (username, password_hash, api_token, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, username, created_at;",
            params![username, password_hash, api_token, now_epoch_ms()],
            parse_user_row,
        );

        match result {
            Ok(user) => Ok(user),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::Conflict(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_token(&self, api_token: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE api_token = ?1;",
                [api_token],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<_, UserId>("id")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
    })
}
