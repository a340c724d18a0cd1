//! Schema Bootstrap
//! Mission: Create the helpdesk schema, load demo seed data, bootstrap admin

use anyhow::{Context, Result};
use bcrypt::DEFAULT_COST;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

/// Helpdesk schema. Comments cascade with their ticket so a ticket delete
/// succeeds under enforced foreign keys.
const SCHEMA_SQL: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    full_name TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'agent',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    priority TEXT NOT NULL DEFAULT 'medium',
    status TEXT NOT NULL DEFAULT 'open',
    reporter_id INTEGER NOT NULL REFERENCES users(id),
    assignee_id INTEGER REFERENCES users(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES users(id),
    text TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_tickets_created
    ON tickets(created_at DESC);

CREATE INDEX IF NOT EXISTS idx_comments_ticket
    ON comments(ticket_id, created_at);
"#;

/// Demo users loaded by `--seed`. Passwords are stored here in plaintext
/// and bcrypt-hashed at insert time.
const SEED_USERS: &[(&str, &str, &str, &str)] = &[
    ("jdoe", "John Doe", "password123", "agent"),
    ("msmith", "Mary Smith", "changeme", "agent"),
];

/// Create the schema idempotently.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
        .context("Failed to create schema")?;
    Ok(())
}

/// Load demo users, tickets and comments. Skips users that already exist.
pub fn seed_demo_data(conn: &Connection) -> Result<()> {
    for (username, full_name, password, role) in SEED_USERS {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            continue;
        }

        let hashed = bcrypt::hash(password, DEFAULT_COST).context("Failed to hash password")?;
        conn.execute(
            "INSERT INTO users (username, full_name, password_hash, role)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, full_name, hashed, role],
        )?;
        info!("🔐 Seeded user '{}' with hashed password", username);
    }

    let ticket_count: i64 = conn.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?;
    if ticket_count > 0 {
        return Ok(());
    }

    let reporter_id: i64 = conn.query_row(
        "SELECT id FROM users WHERE username = 'jdoe'",
        [],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO tickets (title, description, priority, status, reporter_id, assignee_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, 'open', ?4, NULL, datetime('now'), datetime('now'))",
        params![
            "Printer on floor 2 is jammed",
            "Paper jam light keeps blinking after clearing the tray.",
            "low",
            reporter_id,
        ],
    )?;
    let first_ticket = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO tickets (title, description, priority, status, reporter_id, assignee_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, 'open', ?4, NULL, datetime('now'), datetime('now'))",
        params![
            "VPN drops every 30 minutes",
            "Affects the whole sales team since Monday.",
            "high",
            reporter_id,
        ],
    )?;

    conn.execute(
        "INSERT INTO comments (ticket_id, author_id, text, created_at)
         VALUES (?1, ?2, ?3, datetime('now'))",
        params![first_ticket, reporter_id, "Tried power-cycling, no luck."],
    )?;

    info!("🗃️  Seeded demo tickets and comments");
    Ok(())
}

/// Create or repair the default admin account.
///
/// Missing admin → created with the default password. Existing admin whose
/// hash no longer verifies against the default → hash reset. Role is forced
/// back to `admin` either way.
pub fn ensure_admin(conn: &Connection) -> Result<()> {
    const USERNAME: &str = "admin";
    const DEFAULT_PASSWORD: &str = "admin123";
    const DEFAULT_ROLE: &str = "admin";

    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT password_hash, role FROM users WHERE username = ?1",
            params![USERNAME],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match row {
        None => {
            let hashed =
                bcrypt::hash(DEFAULT_PASSWORD, DEFAULT_COST).context("Failed to hash password")?;
            conn.execute(
                "INSERT INTO users (username, full_name, password_hash, role)
                 VALUES (?1, ?2, ?3, ?4)",
                params![USERNAME, "Administrador del sistema", hashed, DEFAULT_ROLE],
            )?;
            info!("✅ Admin user created (username: admin, password: admin123)");
        }
        Some((db_hash, db_role)) => {
            let same_pass = bcrypt::verify(DEFAULT_PASSWORD, &db_hash).unwrap_or(false);
            if !same_pass {
                let hashed = bcrypt::hash(DEFAULT_PASSWORD, DEFAULT_COST)
                    .context("Failed to hash password")?;
                conn.execute(
                    "UPDATE users SET password_hash = ?1 WHERE username = ?2",
                    params![hashed, USERNAME],
                )?;
                info!("🔄 Admin password reset to the default");
            }
            if db_role != DEFAULT_ROLE {
                conn.execute(
                    "UPDATE users SET role = ?1 WHERE username = ?2",
                    params![DEFAULT_ROLE, USERNAME],
                )?;
                info!("🔧 Admin role restored");
            }
        }
    }

    Ok(())
}
