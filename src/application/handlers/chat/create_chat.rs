//! CreateChatHandler - opens a new interview conversation.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::interview::{normalize_title, Conversation};
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Command to create a conversation.
#[derive(Debug, Clone)]
pub struct CreateChatCommand {
    pub owner: UserId,
    /// Missing or blank titles become "Nuevo Chat".
    pub title: Option<String>,
}

/// Handler for creating conversations.
pub struct CreateChatHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl CreateChatHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateChatCommand) -> Result<Conversation, ChatError> {
        let title = normalize_title(cmd.title.as_deref())?;
        let conversation = self.repository.create(cmd.owner, &title).await?;

        tracing::info!(conversation_id = %conversation.id, owner = %cmd.owner, "Conversation created");
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::interview::{ConversationStatus, DEFAULT_TITLE};

    fn handler() -> CreateChatHandler {
        CreateChatHandler::new(Arc::new(InMemoryConversationStore::new()))
    }

    fn command(title: Option<&str>) -> CreateChatCommand {
        CreateChatCommand {
            owner: UserId::new(1).unwrap(),
            title: title.map(String::from),
        }
    }

    #[tokio::test]
    async fn creates_active_conversation() {
        let conversation = handler().handle(command(Some(" Entrevista DAM "))).await.unwrap();

        assert_eq!(conversation.title, "Entrevista DAM");
        assert_eq!(conversation.status(), ConversationStatus::Active);
        assert!(conversation.completed_at().is_none());
    }

    #[tokio::test]
    async fn missing_title_uses_default() {
        let h = handler();
        assert_eq!(h.handle(command(None)).await.unwrap().title, DEFAULT_TITLE);
        assert_eq!(h.handle(command(Some("   "))).await.unwrap().title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn rejects_overlong_title() {
        let long = "x".repeat(201);
        let err = handler().handle(command(Some(&long))).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }
}
