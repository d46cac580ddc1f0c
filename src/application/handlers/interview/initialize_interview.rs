//! InitializeInterviewHandler - stores the interviewer's opening greeting.
//!
//! No model call is made. Initializing an interview that already has turns
//! returns its first turn instead of adding another greeting.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::interview::{Sender, Turn};
use crate::ports::TurnStore;

use super::errors::ExchangeError;
use super::prompts::OPENING_GREETING;

/// Command to open an interview.
#[derive(Debug, Clone)]
pub struct InitializeInterviewCommand {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
}

/// Result of initializing an interview.
#[derive(Debug, Clone)]
pub struct InitializeInterviewResult {
    /// The greeting, or the first existing turn.
    pub turn: Turn,
    /// False when the conversation was already initialized.
    pub created: bool,
}

/// Handler for interview initialization.
pub struct InitializeInterviewHandler {
    store: Arc<dyn TurnStore>,
}

impl InitializeInterviewHandler {
    pub fn new(store: Arc<dyn TurnStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: InitializeInterviewCommand,
    ) -> Result<InitializeInterviewResult, ExchangeError> {
        let mut tx = self.store.begin().await?;
        let conversation = tx
            .lock_conversation(cmd.conversation_id, cmd.user_id)
            .await?
            .ok_or(ExchangeError::ConversationNotFound(cmd.conversation_id))?;

        // Newest first, so the opening turn is the last one.
        if let Some(first) = tx.list_turns(conversation.id, usize::MAX).await?.pop() {
            tx.rollback().await?;
            return Ok(InitializeInterviewResult {
                turn: first,
                created: false,
            });
        }

        if !conversation.accepts_replies() {
            return Err(ExchangeError::ConversationClosed(conversation.id));
        }

        let turn = tx
            .create_turn(conversation.id, Sender::Model, OPENING_GREETING)
            .await?;
        tx.commit().await?;

        tracing::info!(conversation_id = %conversation.id, turn_id = %turn.id, "Interview initialized");

        Ok(InitializeInterviewResult {
            turn,
            created: true,
        })
    }
}
