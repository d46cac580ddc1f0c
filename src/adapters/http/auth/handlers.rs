//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::account_error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::account::{
    GetCurrentUserHandler, GetCurrentUserQuery, LoginCommand, LoginHandler, RegisterCommand,
    RegisterHandler,
};
use crate::ports::{PasswordHasher, SessionIssuer, UserRepository};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AuthHandlers {
    register_handler: Arc<RegisterHandler>,
    login_handler: Arc<LoginHandler>,
    current_user_handler: Arc<GetCurrentUserHandler>,
}

impl AuthHandlers {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            register_handler: Arc::new(RegisterHandler::new(
                users.clone(),
                hasher.clone(),
                issuer.clone(),
            )),
            login_handler: Arc::new(LoginHandler::new(users.clone(), hasher, issuer)),
            current_user_handler: Arc::new(GetCurrentUserHandler::new(users)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/auth/register - Create an account and log in
pub async fn register(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let cmd = RegisterCommand {
        email: req.email,
        password: req.password,
        name: req.nombre,
    };

    match handlers.register_handler.handle(cmd).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(TokenResponse::bearer(session.access_token)),
        )
            .into_response(),
        Err(e) => account_error_response(e),
    }
}

/// POST /api/v1/auth/login - Exchange credentials for a token
pub async fn login(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let cmd = LoginCommand {
        email: req.email,
        password: req.password,
    };

    match handlers.login_handler.handle(cmd).await {
        Ok(session) => {
            (StatusCode::OK, Json(TokenResponse::bearer(session.access_token))).into_response()
        }
        Err(e) => account_error_response(e),
    }
}

/// GET /api/v1/auth/me - The account behind the session
pub async fn me(State(handlers): State<AuthHandlers>, RequireAuth(user): RequireAuth) -> Response {
    let query = GetCurrentUserQuery { user_id: user.id };

    match handlers.current_user_handler.handle(query).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Err(e) => account_error_response(e),
    }
}
