//! Router Assembly
//! Mission: Wire handlers, auth gate, CORS, and request logging into one app

use crate::auth::{api as auth_api, auth_middleware, JwtHandler};
use crate::middleware::logging::request_logging;
use crate::store::Database;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state: the connection factory and the token handler.
/// Both are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtHandler>,
}

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    // Dev frontend origins (Vite and CRA defaults).
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ])
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = Router::new()
        .route(
            "/tickets",
            get(crate::api::tickets::list_tickets).post(crate::api::tickets::create_ticket),
        )
        .route(
            "/tickets/:id",
            put(crate::api::tickets::update_ticket).delete(crate::api::tickets::delete_ticket),
        )
        .route("/tickets/:id/comments", post(crate::api::tickets::add_comment))
        .route("/users", get(auth_api::list_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(auth_api::login))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
