//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::account::User;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nombre: String,
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Bearer token returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id_usuario: i64,
    pub email: String,
    pub nombre: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id_usuario: user.id.value(),
            email: user.email,
            nombre: user.name,
            created_at: user.created_at.as_datetime().to_rfc3339(),
        }
    }
}
