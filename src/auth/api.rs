//! Authentication Endpoints
//! Mission: Login and the admin-only user listing

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::auth::models::{AuthUser, LoginRequest, LoginResponse, LoginUser, UserResponse};
use crate::auth::password::verify_password;
use crate::store::users;
use axum::{extract::State, Extension, Json};
use tracing::{info, warn};

/// Login endpoint - POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("🔐 Login attempt: {}", payload.username);

    let conn = state.db.connect()?;
    let user = users::find_by_username(&conn, &payload.username)?;

    // Unknown username and wrong password take the same path: no user
    // enumeration through the response.
    let Some(user) = user else {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&payload.password, Some(&user.password_hash)) {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.issue(&user.username)?;

    info!("✅ Login successful: {} ({})", user.username, user.role);

    Ok(Json(LoginResponse {
        token,
        user: LoginUser::from_user(&user),
    }))
}

/// List all users - GET /users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !current.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let conn = state.db.connect()?;
    let users = users::list(&conn)?;

    let response: Vec<UserResponse> = users.iter().map(UserResponse::from_user).collect();
    Ok(Json(response))
}
