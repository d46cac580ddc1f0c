//! Mock session service for tests.
//!
//! Maps fixed token strings to users without any signing. Issued tokens
//! are `mock-session-<id>` and validate immediately.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{SessionIssuer, SessionValidator};

/// Token-to-user lookup table. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to `user`.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a user with a generated name and email.
    pub fn with_test_user(self, token: impl Into<String>, user_id: i64) -> Self {
        match UserId::new(user_id) {
            Ok(id) => {
                let user = AuthenticatedUser::new(
                    id,
                    Some(format!("user{}@test.example.com", user_id)),
                    Some(format!("Candidato {}", user_id)),
                );
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    /// Forces every validation and issue to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        if let Ok(mut forced) = self.force_error.write() {
            *forced = Some(error);
        }
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), user);
        }
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let forced = self
            .force_error
            .read()
            .map_err(|_| AuthError::service_unavailable("mock lock poisoned"))?
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        self.tokens
            .read()
            .map_err(|_| AuthError::service_unavailable("mock lock poisoned"))?
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

impl SessionIssuer for MockSessionValidator {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let forced = self
            .force_error
            .read()
            .map_err(|_| AuthError::service_unavailable("mock lock poisoned"))?
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        let token = format!("mock-session-{}", user.id);
        self.tokens
            .write()
            .map_err(|_| AuthError::service_unavailable("mock lock poisoned"))?
            .insert(token.clone(), user.clone());
        Ok(token)
    }
}
