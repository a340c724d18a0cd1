//! Relational Store
//! Mission: SQLite access with one short-lived connection per request

pub mod schema;
pub mod tickets;
pub mod users;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Handle to the helpdesk database.
///
/// Holds only the path: every request opens its own connection via
/// [`Database::connect`] and drops it when the handler returns, on success
/// and error paths alike. Nothing is shared across requests.
#[derive(Debug, Clone)]
pub struct Database {
    db_path: String,
}

impl Database {
    /// Create a handle. Fails if the database file does not exist — schema
    /// creation belongs to the `init-db` binary.
    pub fn new(db_path: &str) -> Result<Self> {
        if !Path::new(db_path).exists() {
            bail!("database not found at {}", db_path);
        }
        Ok(Self {
            db_path: db_path.to_string(),
        })
    }

    /// Open a connection with foreign keys enforced.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open database at {}", self.db_path))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}
