//! In-memory user store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{NewUser, User};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
struct UserState {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// In-memory implementation of `UserRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<UserState>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::new(
                ErrorCode::EmailTaken,
                format!("Email already registered: {}", user.email),
            ));
        }

        state.next_id += 1;
        let id = UserId::new(state.next_id)?;
        let stored = User {
            id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: Timestamp::now(),
        };
        state.users.insert(id.value(), stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id.value()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: "Ana".into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn created_users_are_found_by_email_and_id() {
        let store = InMemoryUserStore::new();
        let a = store.create(new_user("a@example.com")).await.unwrap();
        let b = store.create(new_user("b@example.com")).await.unwrap();

        assert_eq!(a.id.value() + 1, b.id.value());
        assert_eq!(store.find_by_email("b@example.com").await.unwrap(), Some(b));
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a));
        assert!(store.find_by_email("c@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_fails_with_email_taken() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();

        let err = store.create(new_user("a@example.com")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::EmailTaken);
    }
}
