//! GetChatHandler - one owned conversation.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::interview::Conversation;
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Query for a single conversation.
#[derive(Debug, Clone)]
pub struct GetChatQuery {
    pub owner: UserId,
    pub conversation_id: ConversationId,
}

/// Handler for fetching a conversation.
pub struct GetChatHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl GetChatHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetChatQuery) -> Result<Conversation, ChatError> {
        self.repository
            .find_owned(query.conversation_id, query.owner)
            .await?
            .ok_or(ChatError::NotFound(query.conversation_id))
    }
}
