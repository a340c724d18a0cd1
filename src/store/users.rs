//! User Lookups
//! Mission: Read-only user queries for login and authorization

use crate::auth::models::User;
use anyhow::Result;
use rusqlite::{params, Connection};

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Look up a user by username, hash included.
pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, full_name, password_hash, role, created_at
         FROM users WHERE username = ?1",
    )?;

    match stmt.query_row(params![username], row_to_user) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List all users, ordered by id.
pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, full_name, password_hash, role, created_at
         FROM users ORDER BY id",
    )?;

    let users = stmt
        .query_map([], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(users)
}
