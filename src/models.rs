//! Domain Models
//! Mission: Ticket and comment types plus the request payloads that mutate them

use serde::{Deserialize, Deserializer, Serialize};

/// A helpdesk ticket as stored. Timestamps are SQLite `datetime('now')`
/// strings and pass through to responses verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub reporter_id: i64,
    pub assignee_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub comments: Vec<Comment>,
}

/// A comment attached to a ticket. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: String,
}

/// Payload for POST /tickets.
#[derive(Debug, Deserialize)]
pub struct TicketCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Partial update for PUT /tickets/{id}.
///
/// The outer `Option` tracks whether the field appeared in the request at
/// all; the inner one carries an explicit JSON null. Absent fields are left
/// untouched, explicit nulls are applied.
#[derive(Debug, Default, Deserialize)]
pub struct TicketUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<i64>>,
}

impl TicketUpdate {
    /// True when no field was present in the request body.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}

/// Payload for POST /tickets/{id}/comments.
#[derive(Debug, Deserialize)]
pub struct CommentCreate {
    #[serde(default)]
    pub text: Option<String>,
}

/// Deserialize a field so that "present but null" becomes `Some(None)`
/// while a missing field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
