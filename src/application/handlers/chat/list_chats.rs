//! ListChatsHandler - the caller's conversations, most recent first.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::interview::Conversation;
use crate::ports::ConversationRepository;

use super::errors::ChatError;

/// Query for the caller's conversations.
#[derive(Debug, Clone)]
pub struct ListChatsQuery {
    pub owner: UserId,
}

/// Handler for listing conversations.
pub struct ListChatsHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl ListChatsHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListChatsQuery) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repository.list_for_owner(query.owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::foundation::Timestamp;
    use chrono::Duration;

    #[tokio::test]
    async fn lists_only_own_conversations_newest_first() {
        let store = InMemoryConversationStore::new();
        let me = UserId::new(1).unwrap();
        let other = UserId::new(2).unwrap();

        let mut older = store.create(me, "vieja").await.unwrap();
        older.touch(Timestamp::from_datetime(
            *older.last_message_at.as_datetime() - Duration::hours(1),
        ));
        store.update(&older).await.unwrap();
        store.create(me, "nueva").await.unwrap();
        store.create(other, "ajena").await.unwrap();

        let handler = ListChatsHandler::new(Arc::new(store));
        let chats = handler.handle(ListChatsQuery { owner: me }).await.unwrap();

        let titles: Vec<&str> = chats.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["nueva", "vieja"]);
    }
}
