//! In-memory conversation store.
//!
//! Implements both `ConversationRepository` and `TurnStore` over shared
//! maps. Useful for tests and local development without PostgreSQL.
//!
//! Transactions stage their writes and apply them on commit. Locking a
//! conversation takes a per-conversation async mutex held until the
//! transaction ends, mirroring `SELECT ... FOR UPDATE`.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, Timestamp, TurnId, UserId,
};
use crate::domain::interview::{Conversation, Sender, Turn};
use crate::ports::{ConversationRepository, TurnStore, TurnTransaction};

#[derive(Debug, Default)]
struct StoreState {
    conversations: BTreeMap<ConversationId, Conversation>,
    turns: Vec<Turn>,
}

impl StoreState {
    fn turns_newest_first(&self, conversation_id: ConversationId) -> Vec<Turn> {
        let mut turns: Vec<Turn> = self
            .turns
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .cloned()
            .collect();
        sort_newest_first(&mut turns);
        turns
    }
}

fn sort_newest_first(turns: &mut [Turn]) {
    turns.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

/// In-memory implementation of the conversation ports.
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    state: Arc<RwLock<StoreState>>,
    locks: Arc<Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>>,
    next_conversation_id: Arc<AtomicI64>,
    next_turn_id: Arc<AtomicI64>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            locks: Arc::new(Mutex::new(HashMap::new())),
            next_conversation_id: Arc::new(AtomicI64::new(1)),
            next_turn_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of committed turns in a conversation.
    pub async fn turn_count(&self, conversation_id: ConversationId) -> usize {
        self.state
            .read()
            .await
            .turns
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .count()
    }

    /// Committed turns in chronological order.
    pub async fn turns_chronological(&self, conversation_id: ConversationId) -> Vec<Turn> {
        let mut turns = self.state.read().await.turns_newest_first(conversation_id);
        turns.reverse();
        turns
    }

    /// Committed conversation regardless of owner.
    pub async fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.state.read().await.conversations.get(&id).cloned()
    }

    fn conversation_lock(&self, id: ConversationId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Drops the lock entry of a deleted conversation. Transactions already
    /// holding it keep their guard; later lockers find no conversation.
    fn forget_lock(&self, id: ConversationId) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.remove(&id);
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    fn allocate_turn_id(&self) -> TurnId {
        TurnId::from_raw(self.next_turn_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: ConversationId) -> DomainError {
    DomainError::new(
        ErrorCode::ConversationNotFound,
        format!("Conversation not found: {}", id),
    )
}

#[async_trait]
impl ConversationRepository for InMemoryConversationStore {
    async fn create(&self, owner: UserId, title: &str) -> Result<Conversation, DomainError> {
        let id = ConversationId::from_raw(self.next_conversation_id.fetch_add(1, Ordering::SeqCst));
        let conversation = Conversation::new(id, owner, title.to_string(), Timestamp::now());
        self.state
            .write()
            .await
            .conversations
            .insert(id, conversation.clone());
        Ok(conversation)
    }

    async fn find_owned(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .conversations
            .get(&id)
            .filter(|c| c.is_owned_by(&owner))
            .cloned())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Conversation>, DomainError> {
        let mut conversations: Vec<Conversation> = self
            .state
            .read()
            .await
            .conversations
            .values()
            .filter(|c| c.is_owned_by(&owner))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| (b.last_message_at, b.id).cmp(&(a.last_message_at, a.id)));
        Ok(conversations)
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.conversations.get_mut(&conversation.id) {
            Some(stored) => {
                *stored = conversation.clone();
                Ok(())
            }
            None => Err(not_found(conversation.id)),
        }
    }

    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let owned = state
            .conversations
            .get(&id)
            .is_some_and(|c| c.is_owned_by(&owner));
        if !owned {
            return Ok(false);
        }
        state.conversations.remove(&id);
        state.turns.retain(|t| t.conversation_id != id);
        drop(state);
        self.forget_lock(id);
        Ok(true)
    }

    async fn list_turns(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError> {
        let mut turns = self.state.read().await.turns_newest_first(conversation_id);
        turns.truncate(limit);
        Ok(turns)
    }
}

#[async_trait]
impl TurnStore for InMemoryConversationStore {
    async fn begin(&self) -> Result<Box<dyn TurnTransaction>, DomainError> {
        Ok(Box::new(InMemoryTransaction {
            store: self.clone(),
            guards: Vec::new(),
            staged_turns: Vec::new(),
            completions: HashMap::new(),
        }))
    }
}

/// Staged unit of work. Dropping it discards every staged write.
struct InMemoryTransaction {
    store: InMemoryConversationStore,
    guards: Vec<(ConversationId, OwnedMutexGuard<()>)>,
    staged_turns: Vec<Turn>,
    completions: HashMap<ConversationId, Timestamp>,
}

impl InMemoryTransaction {
    fn holds_lock(&self, id: ConversationId) -> bool {
        self.guards.iter().any(|(locked, _)| *locked == id)
    }

    /// Applies staged writes to a committed conversation snapshot.
    fn overlay(&self, mut conversation: Conversation) -> Conversation {
        if let Some(latest) = self
            .staged_turns
            .iter()
            .filter(|t| t.conversation_id == conversation.id)
            .map(|t| t.created_at)
            .max()
        {
            conversation.touch(latest);
        }
        if let Some(at) = self.completions.get(&conversation.id) {
            conversation.mark_completed(*at);
        }
        conversation
    }
}

#[async_trait]
impl TurnTransaction for InMemoryTransaction {
    async fn lock_conversation(
        &mut self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError> {
        if !self.holds_lock(id) {
            let guard = self.store.conversation_lock(id).lock_owned().await;
            self.guards.push((id, guard));
        }

        let committed = self
            .store
            .state
            .read()
            .await
            .conversations
            .get(&id)
            .filter(|c| c.is_owned_by(&owner))
            .cloned();

        Ok(committed.map(|c| self.overlay(c)))
    }

    async fn create_turn(
        &mut self,
        conversation_id: ConversationId,
        sender: Sender,
        content: &str,
    ) -> Result<Turn, DomainError> {
        if !self
            .store
            .state
            .read()
            .await
            .conversations
            .contains_key(&conversation_id)
        {
            return Err(not_found(conversation_id));
        }

        let turn = Turn {
            id: self.store.allocate_turn_id(),
            conversation_id,
            sender,
            content: content.to_string(),
            created_at: Timestamp::now(),
        };
        self.staged_turns.push(turn.clone());
        Ok(turn)
    }

    async fn list_turns(
        &mut self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError> {
        let mut turns = self.store.state.read().await.turns_newest_first(conversation_id);
        turns.extend(
            self.staged_turns
                .iter()
                .filter(|t| t.conversation_id == conversation_id)
                .cloned(),
        );
        sort_newest_first(&mut turns);
        turns.truncate(limit);
        Ok(turns)
    }

    async fn mark_completed(&mut self, conversation_id: ConversationId) -> Result<(), DomainError> {
        self.completions
            .entry(conversation_id)
            .or_insert_with(Timestamp::now);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let mut state = self.store.state.write().await;

        let touched: Vec<ConversationId> = self
            .staged_turns
            .iter()
            .map(|t| t.conversation_id)
            .chain(self.completions.keys().copied())
            .collect();

        for id in touched {
            if let Some(stored) = state.conversations.get(&id).cloned() {
                let updated = self.overlay(stored);
                state.conversations.insert(id, updated);
            }
        }

        let live: Vec<Turn> = self
            .staged_turns
            .iter()
            .filter(|t| state.conversations.contains_key(&t.conversation_id))
            .cloned()
            .collect();
        state.turns.extend(live);

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interview::ConversationStatus;
    use std::time::Duration;

    fn owner() -> UserId {
        UserId::new(1).unwrap()
    }

    mod repository {
        use super::*;

        #[tokio::test]
        async fn create_and_find_scoped_by_owner() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "Entrevista DAW").await.unwrap();

            let found = store.find_owned(conv.id, owner()).await.unwrap();
            assert_eq!(found.unwrap().title, "Entrevista DAW");

            let stranger = UserId::new(2).unwrap();
            assert!(store.find_owned(conv.id, stranger).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn ids_are_sequential() {
            let store = InMemoryConversationStore::new();
            let a = store.create(owner(), "a").await.unwrap();
            let b = store.create(owner(), "b").await.unwrap();
            assert_eq!(a.id.value() + 1, b.id.value());
        }

        #[tokio::test]
        async fn update_missing_conversation_fails() {
            let store = InMemoryConversationStore::new();
            let ghost = Conversation::new(
                ConversationId::from_raw(99),
                owner(),
                "x".into(),
                Timestamp::now(),
            );
            let err = store.update(&ghost).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::ConversationNotFound);
        }

        #[tokio::test]
        async fn delete_cascades_turns() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();
            let mut tx = store.begin().await.unwrap();
            tx.lock_conversation(conv.id, owner()).await.unwrap();
            tx.create_turn(conv.id, Sender::User, "hola").await.unwrap();
            tx.commit().await.unwrap();

            assert!(!store.delete(conv.id, UserId::new(2).unwrap()).await.unwrap());
            assert!(store.delete(conv.id, owner()).await.unwrap());
            assert_eq!(store.turn_count(conv.id).await, 0);
        }

        #[tokio::test]
        async fn delete_releases_the_conversation_lock() {
            let store = InMemoryConversationStore::new();
            let kept = store.create(owner(), "kept").await.unwrap();
            let doomed = store.create(owner(), "doomed").await.unwrap();
            for id in [kept.id, doomed.id] {
                let mut tx = store.begin().await.unwrap();
                tx.lock_conversation(id, owner()).await.unwrap();
                tx.commit().await.unwrap();
            }
            assert_eq!(store.tracked_locks(), 2);

            assert!(store.delete(doomed.id, owner()).await.unwrap());
            assert_eq!(store.tracked_locks(), 1);

            assert!(!store.delete(kept.id, UserId::new(2).unwrap()).await.unwrap());
            assert_eq!(store.tracked_locks(), 1);
        }
    }

    mod transactions {
        use super::*;

        #[tokio::test]
        async fn writes_are_invisible_until_commit() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            let mut tx = store.begin().await.unwrap();
            tx.lock_conversation(conv.id, owner()).await.unwrap();
            tx.create_turn(conv.id, Sender::User, "uno").await.unwrap();
            tx.create_turn(conv.id, Sender::Model, "dos").await.unwrap();

            assert_eq!(store.turn_count(conv.id).await, 0);
            let own_view = tx.list_turns(conv.id, 10).await.unwrap();
            assert_eq!(own_view.len(), 2);
            assert_eq!(own_view[0].content, "dos");

            tx.commit().await.unwrap();
            let turns = store.turns_chronological(conv.id).await;
            assert_eq!(turns.len(), 2);
            assert_eq!(turns[0].sender, Sender::User);
            assert_eq!(turns[1].sender, Sender::Model);
        }

        #[tokio::test]
        async fn dropping_a_transaction_discards_writes() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            {
                let mut tx = store.begin().await.unwrap();
                tx.lock_conversation(conv.id, owner()).await.unwrap();
                tx.create_turn(conv.id, Sender::User, "perdido").await.unwrap();
                tx.mark_completed(conv.id).await.unwrap();
            }

            assert_eq!(store.turn_count(conv.id).await, 0);
            let stored = store.get(conv.id).await.unwrap();
            assert_eq!(stored.status(), ConversationStatus::Active);
        }

        #[tokio::test]
        async fn explicit_rollback_discards_writes() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            let mut tx = store.begin().await.unwrap();
            tx.lock_conversation(conv.id, owner()).await.unwrap();
            tx.create_turn(conv.id, Sender::User, "perdido").await.unwrap();
            tx.rollback().await.unwrap();

            assert_eq!(store.turn_count(conv.id).await, 0);
        }

        #[tokio::test]
        async fn commit_applies_completion_and_activity() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            let mut tx = store.begin().await.unwrap();
            let locked = tx.lock_conversation(conv.id, owner()).await.unwrap().unwrap();
            assert!(locked.accepts_replies());
            let turn = tx.create_turn(conv.id, Sender::Model, "informe").await.unwrap();
            tx.mark_completed(conv.id).await.unwrap();
            tx.commit().await.unwrap();

            let stored = store.get(conv.id).await.unwrap();
            assert_eq!(stored.status(), ConversationStatus::Completed);
            assert!(stored.completed_at().is_some());
            assert_eq!(stored.last_message_at, turn.created_at);
        }

        #[tokio::test]
        async fn lock_hides_foreign_conversations() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            let mut tx = store.begin().await.unwrap();
            let locked = tx
                .lock_conversation(conv.id, UserId::new(5).unwrap())
                .await
                .unwrap();
            assert!(locked.is_none());
        }

        #[tokio::test]
        async fn create_turn_on_missing_conversation_fails() {
            let store = InMemoryConversationStore::new();
            let mut tx = store.begin().await.unwrap();
            let err = tx
                .create_turn(ConversationId::from_raw(42), Sender::User, "hola")
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ConversationNotFound);
        }

        #[tokio::test]
        async fn lock_serialises_transactions_on_one_conversation() {
            let store = InMemoryConversationStore::new();
            let conv = store.create(owner(), "x").await.unwrap();

            let mut first = store.begin().await.unwrap();
            first.lock_conversation(conv.id, owner()).await.unwrap();

            let contender = store.clone();
            let waiter = tokio::spawn(async move {
                let mut second = contender.begin().await.unwrap();
                second.lock_conversation(conv.id, owner()).await.unwrap();
                second.list_turns(conv.id, 10).await.unwrap().len()
            });

            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(!waiter.is_finished());

            first.create_turn(conv.id, Sender::User, "hola").await.unwrap();
            first.commit().await.unwrap();

            assert_eq!(waiter.await.unwrap(), 1);
        }
    }
}
