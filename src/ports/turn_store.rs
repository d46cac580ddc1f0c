//! Turn store port - transactional writes for interview exchanges.
//!
//! An exchange opens one [`TurnTransaction`], performs every read and write
//! through it and finishes with exactly one `commit`. Any other exit path
//! (error, early return, dropped future) discards the writes: dropping an
//! uncommitted transaction must roll it back.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError, UserId};
use crate::domain::interview::{Conversation, Sender, Turn};

/// Factory for exchange transactions.
#[async_trait]
pub trait TurnStore: Send + Sync {
    /// Opens a new unit of work.
    async fn begin(&self) -> Result<Box<dyn TurnTransaction>, DomainError>;
}

/// One unit of work over a conversation and its turns.
///
/// Reads observe this transaction's own uncommitted writes.
#[async_trait]
pub trait TurnTransaction: Send {
    /// Loads the conversation if `owner` owns it and holds an exclusive
    /// lock on it until the transaction ends.
    ///
    /// Concurrent exchanges on the same conversation queue here.
    async fn lock_conversation(
        &mut self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError>;

    /// Appends a turn and bumps the conversation's `last_message_at`.
    async fn create_turn(
        &mut self,
        conversation_id: ConversationId,
        sender: Sender,
        content: &str,
    ) -> Result<Turn, DomainError>;

    /// Lists up to `limit` turns, newest first.
    async fn list_turns(
        &mut self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError>;

    /// Marks the conversation completed. An existing completion time is kept.
    async fn mark_completed(&mut self, conversation_id: ConversationId) -> Result<(), DomainError>;

    /// Makes every write of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    /// Discards every write of this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}
