//! DeleteChatHandler - removes a conversation and its turns.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, UserId};
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Command to delete a conversation.
#[derive(Debug, Clone)]
pub struct DeleteChatCommand {
    pub owner: UserId,
    pub conversation_id: ConversationId,
}

/// Handler for deleting conversations.
pub struct DeleteChatHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl DeleteChatHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteChatCommand) -> Result<(), ChatError> {
        if !self.repository.delete(cmd.conversation_id, cmd.owner).await? {
            return Err(ChatError::NotFound(cmd.conversation_id));
        }
        tracing::info!(conversation_id = %cmd.conversation_id, "Conversation deleted");
        Ok(())
    }
}
