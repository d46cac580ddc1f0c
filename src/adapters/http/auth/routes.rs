//! HTTP routes for account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{login, me, register, AuthHandlers};

/// Creates the account router, mounted under `/api/v1/auth`.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(handlers)
}
