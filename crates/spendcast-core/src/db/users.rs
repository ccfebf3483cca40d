//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(2)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a user, returning its id
    pub fn create_user(&self, username: &str) -> Result<i64> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidData("username must not be empty".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (username) VALUES (?)",
            params![username],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, username, created_at FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get a user by ID
    pub fn find_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Get a user by username
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?",
                params![username],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }
}
