//! GetCurrentUserHandler - resolves the account behind a session.

use std::sync::Arc;

use crate::domain::account::User;
use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

use super::errors::AccountError;

#[derive(Debug, Clone)]
pub struct GetCurrentUserQuery {
    pub user_id: UserId,
}

pub struct GetCurrentUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetCurrentUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetCurrentUserQuery) -> Result<User, AccountError> {
        self.users
            .find_by_id(query.user_id)
            .await?
            .ok_or(AccountError::UserNotFound(query.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserStore;
    use crate::domain::account::NewUser;

    #[tokio::test]
    async fn returns_the_stored_account() {
        let users = Arc::new(InMemoryUserStore::new());
        let created = users
            .create(NewUser {
                email: "ana@example.com".into(),
                name: "Ana".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();

        let user = GetCurrentUserHandler::new(users)
            .handle(GetCurrentUserQuery { user_id: created.id })
            .await
            .unwrap();

        assert_eq!(user, created);
    }

    #[tokio::test]
    async fn session_for_deleted_account_is_rejected() {
        let missing = UserId::new(99).unwrap();

        let err = GetCurrentUserHandler::new(Arc::new(InMemoryUserStore::new()))
            .handle(GetCurrentUserQuery { user_id: missing })
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::UserNotFound(id) if id == missing));
    }
}
