//! Authorization Gate
//! Mission: Resolve bearer tokens to user records before protected handlers run

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::auth::models::AuthUser;
use crate::store::users;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Pull the token out of an Authorization header value.
///
/// Accepts `Bearer <token>` (whitespace split, second token) as well as a
/// raw token with no scheme prefix.
pub fn token_from_header(value: &str) -> Option<&str> {
    if value.starts_with("Bearer ") {
        value.split_whitespace().nth(1)
    } else {
        Some(value)
    }
}

/// Middleware guarding every protected route.
///
/// Validates the token, then resolves the subject against the users table
/// on a per-request connection. A deleted or renamed user fails exactly
/// like a bad token — callers cannot tell the difference. The resolved
/// [`AuthUser`] lands in request extensions for the handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = token_from_header(header).ok_or(ApiError::Unauthenticated)?;

    let claims = state
        .jwt
        .validate(token)
        .map_err(|_| ApiError::Unauthenticated)?;

    let conn = state.db.connect()?;
    let user = users::find_by_username(&conn, &claims.sub)?.ok_or_else(|| {
        debug!("Token subject '{}' has no user row", claims.sub);
        ApiError::Unauthenticated
    })?;

    req.extensions_mut().insert(AuthUser::from_user(&user));

    Ok(next.run(req).await)
}
