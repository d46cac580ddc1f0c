//! Authentication middleware and extractor for axum.
//!
//! - `auth_middleware` validates Bearer tokens and injects the user into
//!   request extensions
//! - `RequireAuth` reads that user in handlers and rejects the request
//!   when it is absent
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser in extensions
//!                                      ↓
//!                              Handler → RequireAuth
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates the `Authorization: Bearer <token>` header.
///
/// Requests without the header pass through untouched; `RequireAuth`
/// rejects them later. Invalid tokens are rejected here with 401.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(&e),
    }
}

fn auth_error_response(error: &AuthError) -> Response {
    match error {
        AuthError::TokenExpired => ErrorResponse::new("TOKEN_EXPIRED", "Token expired")
            .into_response_with(StatusCode::UNAUTHORIZED),
        AuthError::InvalidToken => ErrorResponse::new("UNAUTHORIZED", "Invalid token")
            .into_response_with(StatusCode::UNAUTHORIZED),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!(reason = %msg, "Auth service unavailable");
            ErrorResponse::new("AUTH_UNAVAILABLE", "Authentication service unavailable")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Extractor that requires authentication.
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hola, {}", user.candidate_name())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => {
                ErrorResponse::new("UNAUTHENTICATED", "Authentication required")
                    .into_response_with(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
