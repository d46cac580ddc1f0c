//! Conversation repository port (management side).
//!
//! Plain single-statement operations used by the chat management API.
//! Interview exchanges go through [`super::TurnStore`] instead.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError, UserId};
use crate::domain::interview::{Conversation, Turn};

/// Repository port for conversation management.
///
/// Every lookup is scoped by owner: a conversation owned by someone else
/// is indistinguishable from one that does not exist.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Creates a new active conversation.
    async fn create(&self, owner: UserId, title: &str) -> Result<Conversation, DomainError>;

    /// Finds a conversation owned by `owner`.
    async fn find_owned(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError>;

    /// Lists the owner's conversations, most recently active first.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Conversation>, DomainError>;

    /// Persists title, status and completion time.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation no longer exists
    async fn update(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Deletes a conversation and its turns. Returns false if nothing matched.
    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, DomainError>;

    /// Lists up to `limit` turns of a conversation, newest first.
    async fn list_turns(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError>;
}
