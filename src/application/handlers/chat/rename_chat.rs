//! RenameChatHandler - changes a conversation title.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::interview::Conversation;
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Command to rename a conversation.
#[derive(Debug, Clone)]
pub struct RenameChatCommand {
    pub owner: UserId,
    pub conversation_id: ConversationId,
    pub title: String,
}

/// Handler for renaming conversations.
pub struct RenameChatHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl RenameChatHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RenameChatCommand) -> Result<Conversation, ChatError> {
        // 1. Load, scoped by owner
        let mut conversation = self
            .repository
            .find_owned(cmd.conversation_id, cmd.owner)
            .await?
            .ok_or(ChatError::NotFound(cmd.conversation_id))?;

        // 2. Apply rename
        conversation.rename(&cmd.title)?;

        // 3. Persist
        self.repository.update(&conversation).await?;

        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;

    async fn setup() -> (InMemoryConversationStore, RenameChatHandler, Conversation) {
        let store = InMemoryConversationStore::new();
        let conversation = store.create(UserId::new(1).unwrap(), "Nuevo Chat").await.unwrap();
        let handler = RenameChatHandler::new(Arc::new(store.clone()));
        (store, handler, conversation)
    }

    fn command(conversation: &Conversation, title: &str) -> RenameChatCommand {
        RenameChatCommand {
            owner: conversation.owner_id,
            conversation_id: conversation.id,
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn renames_and_persists() {
        let (store, handler, conversation) = setup().await;

        let renamed = handler.handle(command(&conversation, "Entrevista ASIR")).await.unwrap();

        assert_eq!(renamed.title, "Entrevista ASIR");
        assert_eq!(store.get(conversation.id).await.unwrap().title, "Entrevista ASIR");
    }

    #[tokio::test]
    async fn rejects_blank_title() {
        let (store, handler, conversation) = setup().await;

        let err = handler.handle(command(&conversation, "  ")).await.unwrap_err();

        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(store.get(conversation.id).await.unwrap().title, "Nuevo Chat");
    }

    #[tokio::test]
    async fn foreign_conversation_is_not_found() {
        let (_store, handler, conversation) = setup().await;
        let cmd = RenameChatCommand {
            owner: UserId::new(7).unwrap(),
            ..command(&conversation, "x")
        };

        assert!(matches!(handler.handle(cmd).await, Err(ChatError::NotFound(_))));
    }
}
