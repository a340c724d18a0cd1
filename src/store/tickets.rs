//! Ticket Store Adapter
//! Mission: Ticket and comment CRUD over the relational store

use crate::models::{Comment, Ticket, TicketUpdate};
use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
        status: row.get(4)?,
        reporter_id: row.get(5)?,
        assignee_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        comments: Vec::new(),
    })
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        author_id: row.get(2)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

const TICKET_COLUMNS: &str =
    "id, title, description, priority, status, reporter_id, assignee_id, created_at, updated_at";

fn comments_for(conn: &Connection, ticket_id: i64) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT id, ticket_id, author_id, text, created_at
         FROM comments WHERE ticket_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;
    let comments = stmt
        .query_map(params![ticket_id], row_to_comment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

fn ticket_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM tickets WHERE id = ?1", params![id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

/// All tickets, newest first, each with its comments oldest-first.
///
/// `created_at` has second resolution, so id breaks ties to keep
/// same-second creations in newest-first order.
pub fn list_with_comments(conn: &Connection) -> Result<Vec<Ticket>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC, id DESC"
    ))?;
    let mut tickets = stmt
        .query_map([], row_to_ticket)?
        .collect::<Result<Vec<_>, _>>()?;

    for ticket in &mut tickets {
        ticket.comments = comments_for(conn, ticket.id)?;
    }

    Ok(tickets)
}

/// A single ticket with its comments, or None.
pub fn get_with_comments(conn: &Connection, id: i64) -> Result<Option<Ticket>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"
    ))?;

    let ticket = stmt.query_row(params![id], row_to_ticket).optional()?;

    match ticket {
        Some(mut ticket) => {
            ticket.comments = comments_for(conn, ticket.id)?;
            Ok(Some(ticket))
        }
        None => Ok(None),
    }
}

/// Create a ticket. Status starts as "open", assignee empty, timestamps
/// server-assigned.
pub fn create(
    conn: &Connection,
    title: &str,
    description: &str,
    priority: &str,
    reporter_id: i64,
) -> Result<Ticket> {
    conn.execute(
        "INSERT INTO tickets (title, description, priority, status, reporter_id, assignee_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, 'open', ?4, NULL, datetime('now'), datetime('now'))",
        params![title, description, priority, reporter_id],
    )?;
    let id = conn.last_insert_rowid();

    // Freshly inserted, so the row is there; comments are necessarily empty.
    let ticket = get_with_comments(conn, id)?
        .ok_or_else(|| anyhow::anyhow!("ticket {} missing after insert", id))?;
    Ok(ticket)
}

/// Apply a partial update.
///
/// Only fields present in the request are written; an explicit null is a
/// write (clears `assignee_id`). Any applied field refreshes `updated_at`;
/// an empty field set leaves the row untouched. Returns the updated ticket
/// with comments, or None if the id has no row.
pub fn update(conn: &Connection, id: i64, updates: &TicketUpdate) -> Result<Option<Ticket>> {
    if !ticket_exists(conn, id)? {
        return Ok(None);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(title) = &updates.title {
        sets.push("title = ?");
        values.push(Box::new(title.clone()));
    }
    if let Some(description) = &updates.description {
        sets.push("description = ?");
        values.push(Box::new(description.clone()));
    }
    if let Some(priority) = &updates.priority {
        sets.push("priority = ?");
        values.push(Box::new(priority.clone()));
    }
    if let Some(status) = &updates.status {
        sets.push("status = ?");
        values.push(Box::new(status.clone()));
    }
    if let Some(assignee_id) = &updates.assignee_id {
        sets.push("assignee_id = ?");
        values.push(Box::new(*assignee_id));
    }

    if !sets.is_empty() {
        values.push(Box::new(id));
        let sql = format!(
            "UPDATE tickets SET {}, updated_at = datetime('now') WHERE id = ?",
            sets.join(", ")
        );
        conn.execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
    }

    get_with_comments(conn, id)
}

/// Delete a ticket (comments cascade). False if the id has no row.
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    if !ticket_exists(conn, id)? {
        return Ok(false);
    }
    conn.execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
    Ok(true)
}

/// Attach a comment to a ticket. None if the ticket does not exist — the
/// existence check runs before the insert so a dangling id surfaces as
/// not-found rather than a constraint error.
pub fn add_comment(
    conn: &Connection,
    ticket_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Option<Comment>> {
    if !ticket_exists(conn, ticket_id)? {
        return Ok(None);
    }

    conn.execute(
        "INSERT INTO comments (ticket_id, author_id, text, created_at)
         VALUES (?1, ?2, ?3, datetime('now'))",
        params![ticket_id, author_id, text],
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare(
        "SELECT id, ticket_id, author_id, text, created_at
         FROM comments WHERE id = ?1",
    )?;
    let comment = stmt.query_row(params![id], row_to_comment)?;
    Ok(Some(comment))
}
