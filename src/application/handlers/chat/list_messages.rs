//! ListMessagesHandler - the turns of a conversation, newest first.

use std::sync::Arc;

use crate::config::InterviewConfig;
use crate::domain::foundation::{ConversationId, UserId, ValidationError};
use crate::domain::interview::Turn;
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Query for a page of turns.
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub owner: UserId,
    pub conversation_id: ConversationId,
    /// Page size; the configured default when absent.
    pub limit: Option<usize>,
}

/// Handler for listing turns.
pub struct ListMessagesHandler {
    repository: Arc<dyn ConversationRepository>,
    default_limit: usize,
    max_limit: usize,
}

impl ListMessagesHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>, config: &InterviewConfig) -> Self {
        Self {
            repository,
            default_limit: config.messages_page_size,
            max_limit: config.messages_page_max,
        }
    }

    pub async fn handle(&self, query: ListMessagesQuery) -> Result<Vec<Turn>, ChatError> {
        let limit = query.limit.unwrap_or(self.default_limit);
        if limit == 0 || limit > self.max_limit {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                self.max_limit as i32,
                limit.min(i32::MAX as usize) as i32,
            )
            .into());
        }

        let conversation = self
            .repository
            .find_owned(query.conversation_id, query.owner)
            .await?
            .ok_or(ChatError::NotFound(query.conversation_id))?;

        Ok(self.repository.list_turns(conversation.id, limit).await?)
    }
}
