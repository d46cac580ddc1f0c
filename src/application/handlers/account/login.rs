//! LoginHandler - exchanges credentials for a bearer token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{PasswordHasher, SessionIssuer, UserRepository};

use super::errors::AccountError;
use super::register::AuthSession;

/// Command to log in.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Handler for logins.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn SessionIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<AuthSession, AccountError> {
        let email = cmd.email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("Login rejected: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("verify task failed: {}", e))
            })?;
        if !matches {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let access_token = self.issuer.issue(&user.to_authenticated())?;
        tracing::info!(user_id = %user.id, "Logged in");
        Ok(AuthSession { user, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{Argon2PasswordHasher, MockSessionValidator};
    use crate::adapters::memory::InMemoryUserStore;
    use crate::application::handlers::account::{RegisterCommand, RegisterHandler};
    use crate::domain::foundation::AuthError;

    async fn registered(issuer: MockSessionValidator) -> LoginHandler {
        let users = Arc::new(InMemoryUserStore::new());
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let sessions = Arc::new(MockSessionValidator::new());
        RegisterHandler::new(users.clone(), hasher.clone(), sessions)
            .handle(RegisterCommand {
                email: "ana@example.com".into(),
                password: "secreto123".into(),
                name: "Ana".into(),
            })
            .await
            .unwrap();
        LoginHandler::new(users, hasher, Arc::new(issuer))
    }

    fn command(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn correct_password_opens_a_session() {
        let handler = registered(MockSessionValidator::new()).await;

        let session = handler
            .handle(command(" ANA@example.com", "secreto123"))
            .await
            .unwrap();

        assert_eq!(session.user.email, "ana@example.com");
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let handler = registered(MockSessionValidator::new()).await;

        let wrong = handler
            .handle(command("ana@example.com", "secreto124"))
            .await
            .unwrap_err();
        let unknown = handler
            .handle(command("nadie@example.com", "secreto123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn issuer_failure_is_reported() {
        let handler = registered(
            MockSessionValidator::new().with_error(AuthError::service_unavailable("no key")),
        )
        .await;

        let err = handler
            .handle(command("ana@example.com", "secreto123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Session(_)));
    }
}
