//! Authentication Models
//! Mission: User and authentication data structures

use serde::{Deserialize, Serialize};

/// User account row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // never serialize
    pub role: String,
    pub created_at: String,
}

impl User {
    /// Admin check. Roles are free-form strings; the comparison is
    /// case-insensitive so seeded `Admin`/`ADMIN` rows keep working.
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// Authenticated user resolved by the auth middleware, attached to request
/// extensions. Carries no password hash.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
}

impl AuthUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// JWT claims payload: subject plus issued-at. No expiry claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// User summary embedded in the login response.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub username: String,
    pub name: String,
    pub role: String,
}

impl LoginUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.full_name.clone(),
            role: user.role.clone(),
        }
    }
}

/// User row as returned by GET /users (sanitized).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            created_at: user.created_at.clone(),
        }
    }
}
