//! RegisterHandler - creates an account and opens its first session.

use std::sync::Arc;

use crate::domain::account::{
    normalize_email, normalize_name, validate_password, NewUser, User,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{PasswordHasher, SessionIssuer, UserRepository};

use super::errors::AccountError;

/// Command to register a candidate.
#[derive(Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An account together with a fresh bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
}

/// Handler for registrations.
pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn SessionIssuer>,
}

impl RegisterHandler {
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

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<AuthSession, AccountError> {
        let email = normalize_email(&cmd.email)?;
        let name = normalize_name(&cmd.name)?;
        validate_password(&cmd.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("hashing task failed: {}", e))
            })??;

        let user = self
            .users
            .create(NewUser {
                email,
                name,
                password_hash,
            })
            .await?;
        let access_token = self.issuer.issue(&user.to_authenticated())?;

        tracing::info!(user_id = %user.id, "Account registered");
        Ok(AuthSession { user, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{Argon2PasswordHasher, MockSessionValidator};
    use crate::adapters::memory::InMemoryUserStore;
    use crate::ports::SessionValidator;

    struct Fixture {
        users: Arc<InMemoryUserStore>,
        sessions: Arc<MockSessionValidator>,
        handler: RegisterHandler,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserStore::new());
        let sessions = Arc::new(MockSessionValidator::new());
        let handler = RegisterHandler::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            sessions.clone(),
        );
        Fixture {
            users,
            sessions,
            handler,
        }
    }

    fn command(email: &str, password: &str, name: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn registers_and_issues_a_usable_token() {
        let f = fixture();

        let session = f
            .handler
            .handle(command(" Ana@Example.com ", "secreto123", " Ana López "))
            .await
            .unwrap();

        assert_eq!(session.user.email, "ana@example.com");
        assert_eq!(session.user.name, "Ana López");
        assert_ne!(session.user.password_hash, "secreto123");

        let identity = f.sessions.validate(&session.access_token).await.unwrap();
        assert_eq!(identity.id, session.user.id);

        let stored = f.users.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(stored.unwrap().id, session.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let f = fixture();
        f.handler
            .handle(command("ana@example.com", "secreto123", "Ana"))
            .await
            .unwrap();

        let err = f
            .handler
            .handle(command("ANA@example.com", "otraclave9", "Otra Ana"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_storage() {
        let f = fixture();

        let err = f
            .handler
            .handle(command("ana@example.com", "solamenteletras", "Ana"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
        assert!(f.users.find_by_email("ana@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn name_with_digits_is_rejected() {
        let err = fixture()
            .handler
            .handle(command("ana@example.com", "secreto123", "Ana 2"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
    }
}
