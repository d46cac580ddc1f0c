//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what the `SessionValidator` port hands back
//! after checking a bearer token. Nothing here knows about JWT.

use super::UserId;
use thiserror::Error;

/// Candidate identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier, the token subject.
    pub id: UserId,

    /// Email claim, when the issuer included one.
    pub email: Option<String>,

    /// Display name used in report headers.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Name shown as "Candidato" in reports. Falls back to email, then to a
    /// generic label.
    pub fn candidate_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Candidato")
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token could not be issued or checked for infrastructure reasons.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client should obtain a fresh token.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
