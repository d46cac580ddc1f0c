//! SetChatStatusHandler - forced status edit from the management API.
//!
//! Completing sets the completion time (keeping an earlier one), reopening
//! clears it.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, Timestamp, UserId};
use crate::domain::interview::{Conversation, ConversationStatus};
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Command to change a conversation's status.
#[derive(Debug, Clone)]
pub struct SetChatStatusCommand {
    pub owner: UserId,
    pub conversation_id: ConversationId,
    pub status: ConversationStatus,
}

/// Handler for status edits.
pub struct SetChatStatusHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl SetChatStatusHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: SetChatStatusCommand) -> Result<Conversation, ChatError> {
        let mut conversation = self
            .repository
            .find_owned(cmd.conversation_id, cmd.owner)
            .await?
            .ok_or(ChatError::NotFound(cmd.conversation_id))?;

        let previous = conversation.status();
        conversation.set_status(cmd.status, Timestamp::now());
        self.repository.update(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id,
            from = %previous,
            to = %cmd.status,
            "Conversation status changed"
        );
        Ok(conversation)
    }
}
