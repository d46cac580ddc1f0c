//! User repository port.

use async_trait::async_trait;

use crate::domain::account::{NewUser, User};
use crate::domain::foundation::{DomainError, UserId};

/// Storage for registered candidates. Emails arrive already normalized.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if the email is already registered
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;
}
