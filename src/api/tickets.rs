//! Ticket Endpoints
//! Mission: Ticket and comment CRUD handlers with response shaping

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::auth::models::AuthUser;
use crate::models::{Comment, CommentCreate, Ticket, TicketCreate, TicketUpdate};
use crate::store::tickets;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Ticket as serialized to clients: ids as strings, camelCase timestamps,
/// comments nested oldest-first.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub reporter_id: i64,
    pub assignee_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub comments: Vec<CommentResponse>,
}

impl TicketResponse {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority.clone(),
            status: ticket.status.clone(),
            reporter_id: ticket.reporter_id,
            assignee_id: ticket.assignee_id,
            created_at: ticket.created_at.clone(),
            updated_at: ticket.updated_at.clone(),
            comments: ticket
                .comments
                .iter()
                .map(CommentResponse::from_comment)
                .collect(),
        }
    }
}

/// Comment as serialized to clients.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub author_id: i64,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl CommentResponse {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author_id: comment.author_id,
            text: comment.text.clone(),
            created_at: comment.created_at.clone(),
        }
    }
}

/// List tickets - GET /tickets
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let conn = state.db.connect()?;
    let tickets = tickets::list_with_comments(&conn)?;

    let response: Vec<TicketResponse> = tickets.iter().map(TicketResponse::from_ticket).collect();
    Ok(Json(response))
}

/// Create ticket - POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(current): Extension<AuthUser>,
    Json(payload): Json<TicketCreate>,
) -> Result<Json<TicketResponse>, ApiError> {
    let description = payload.description.unwrap_or_default();
    let priority = payload
        .priority
        .unwrap_or_else(|| "medium".to_string());

    let conn = state.db.connect()?;
    let ticket = tickets::create(&conn, &payload.title, &description, &priority, current.id)?;

    info!("🎫 Ticket {} created by {}", ticket.id, current.username);

    Ok(Json(TicketResponse::from_ticket(&ticket)))
}

/// Update ticket - PUT /tickets/{id}
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
    Json(payload): Json<TicketUpdate>,
) -> Result<Json<TicketResponse>, ApiError> {
    let conn = state.db.connect()?;
    let ticket = tickets::update(&conn, ticket_id, &payload)?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(TicketResponse::from_ticket(&ticket)))
}

/// Delete ticket - DELETE /tickets/{id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = state.db.connect()?;
    let deleted = tickets::delete(&conn, ticket_id)?;

    if !deleted {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    info!("🗑️  Ticket {} deleted", ticket_id);

    Ok(Json(json!({ "ok": true })))
}

/// Add comment - POST /tickets/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
    Extension(current): Extension<AuthUser>,
    Json(payload): Json<CommentCreate>,
) -> Result<Json<CommentResponse>, ApiError> {
    let text = payload.text.filter(|t| !t.is_empty());
    let Some(text) = text else {
        return Err(ApiError::BadRequest("Missing text".to_string()));
    };

    let conn = state.db.connect()?;
    let comment = tickets::add_comment(&conn, ticket_id, current.id, &text)?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(CommentResponse::from_comment(&comment)))
}
