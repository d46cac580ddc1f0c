//! PostgreSQL implementation of ConversationRepository and TurnStore.
//!
//! Conversations live in `chats`, turns in `mensajes`. Exchange
//! transactions lock the conversation row with `SELECT ... FOR UPDATE`, so
//! concurrent exchanges on one conversation run one after the other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row, Transaction};

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, Timestamp, TurnId, UserId,
};
use crate::domain::interview::{Conversation, ConversationStatus, Sender, Turn};
use crate::ports::{ConversationRepository, TurnStore, TurnTransaction};

const CONVERSATION_COLUMNS: &str =
    "id_chat, id_usuario, title, status, created_at, last_message_at, completed_at";

const TURN_COLUMNS: &str = "id_mensaje, id_chat, emisor, contenido, sent_at";

/// PostgreSQL-backed conversation storage.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationStore {
    async fn create(&self, owner: UserId, title: &str) -> Result<Conversation, DomainError> {
        let now = Timestamp::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chats (id_usuario, title, status, created_at, last_message_at)
            VALUES ($1, $2, 'active', $3, $3)
            RETURNING id_chat
            "#,
        )
        .bind(owner.value())
        .bind(title)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("insert conversation", e))?;

        Ok(Conversation::new(
            ConversationId::from_raw(id),
            owner,
            title.to_string(),
            now,
        ))
    }

    async fn find_owned(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM chats WHERE id_chat = $1 AND id_usuario = $2",
            CONVERSATION_COLUMNS
        ))
        .bind(id.value())
        .bind(owner.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch conversation", e))?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Conversation>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM chats
            WHERE id_usuario = $1
            ORDER BY COALESCE(last_message_at, created_at) DESC, id_chat DESC
            "#,
            CONVERSATION_COLUMNS
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list conversations", e))?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE chats SET
                title = $2,
                status = $3,
                completed_at = $4,
                last_message_at = $5
            WHERE id_chat = $1
            "#,
        )
        .bind(conversation.id.value())
        .bind(&conversation.title)
        .bind(conversation.status().as_str())
        .bind(conversation.completed_at().map(|t| *t.as_datetime()))
        .bind(conversation.last_message_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update conversation", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(conversation.id));
        }
        Ok(())
    }

    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query(
            r#"
            DELETE FROM mensajes
            WHERE id_chat IN (SELECT id_chat FROM chats WHERE id_chat = $1 AND id_usuario = $2)
            "#,
        )
        .bind(id.value())
        .bind(owner.value())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("delete turns", e))?;

        let result = sqlx::query("DELETE FROM chats WHERE id_chat = $1 AND id_usuario = $2")
            .bind(id.value())
            .bind(owner.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("delete conversation", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_turns(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError> {
        let rows = sqlx::query(&turns_query())
            .bind(conversation_id.value())
            .bind(clamp_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list turns", e))?;

        rows.iter().map(row_to_turn).collect()
    }
}

#[async_trait]
impl TurnStore for PostgresConversationStore {
    async fn begin(&self) -> Result<Box<dyn TurnTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;
        Ok(Box::new(PostgresTurnTransaction { tx }))
    }
}

/// Exchange transaction. Dropping it without `commit` rolls back.
pub struct PostgresTurnTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TurnTransaction for PostgresTurnTransaction {
    async fn lock_conversation(
        &mut self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM chats WHERE id_chat = $1 AND id_usuario = $2 FOR UPDATE",
            CONVERSATION_COLUMNS
        ))
        .bind(id.value())
        .bind(owner.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("lock conversation", e))?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn create_turn(
        &mut self,
        conversation_id: ConversationId,
        sender: Sender,
        content: &str,
    ) -> Result<Turn, DomainError> {
        let now = Timestamp::now();

        let touched = sqlx::query("UPDATE chats SET last_message_at = $2 WHERE id_chat = $1")
            .bind(conversation_id.value())
            .bind(now.as_datetime())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("touch conversation", e))?;
        if touched.rows_affected() == 0 {
            return Err(not_found(conversation_id));
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO mensajes (id_chat, emisor, contenido, sent_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id_mensaje
            "#,
        )
        .bind(conversation_id.value())
        .bind(sender.as_tag())
        .bind(content)
        .bind(now.as_datetime())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error("insert turn", e))?;

        Ok(Turn {
            id: TurnId::from_raw(id),
            conversation_id,
            sender,
            content: content.to_string(),
            created_at: now,
        })
    }

    async fn list_turns(
        &mut self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Turn>, DomainError> {
        let rows = sqlx::query(&turns_query())
            .bind(conversation_id.value())
            .bind(clamp_limit(limit))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error("list turns", e))?;

        rows.iter().map(row_to_turn).collect()
    }

    async fn mark_completed(&mut self, conversation_id: ConversationId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE chats SET
                status = 'completed',
                completed_at = COALESCE(completed_at, $2)
            WHERE id_chat = $1
            "#,
        )
        .bind(conversation_id.value())
        .bind(Timestamp::now().as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("complete conversation", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(conversation_id));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| db_error("roll back transaction", e))
    }
}

fn turns_query() -> String {
    format!(
        r#"
        SELECT {} FROM mensajes
        WHERE id_chat = $1
        ORDER BY sent_at DESC, id_mensaje DESC
        LIMIT $2
        "#,
        TURN_COLUMNS
    )
}

/// `usize::MAX` means "all turns"; Postgres wants a signed limit.
fn clamp_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, action, "Database operation failed");
    DomainError::database(format!("Failed to {}: {}", action, e))
}

fn not_found(id: ConversationId) -> DomainError {
    DomainError::new(
        ErrorCode::ConversationNotFound,
        format!("Conversation not found: {}", id),
    )
}

fn row_to_conversation(row: &PgRow) -> Result<Conversation, DomainError> {
    let id: i64 = row.try_get("id_chat").map_err(|e| db_error("read id_chat", e))?;
    let owner: i64 = row
        .try_get("id_usuario")
        .map_err(|e| db_error("read id_usuario", e))?;
    let title: String = row.try_get("title").map_err(|e| db_error("read title", e))?;
    let status: String = row.try_get("status").map_err(|e| db_error("read status", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| db_error("read created_at", e))?;
    let last_message_at: Option<DateTime<Utc>> = row
        .try_get("last_message_at")
        .map_err(|e| db_error("read last_message_at", e))?;
    let completed_at: Option<DateTime<Utc>> = row
        .try_get("completed_at")
        .map_err(|e| db_error("read completed_at", e))?;

    let status: ConversationStatus = status.parse()?;
    let created_at = Timestamp::from_datetime(created_at);

    Ok(Conversation::reconstitute(
        ConversationId::from_raw(id),
        UserId::new(owner)?,
        title,
        status,
        created_at,
        last_message_at.map(Timestamp::from_datetime).unwrap_or(created_at),
        completed_at.map(Timestamp::from_datetime),
    ))
}

fn row_to_turn(row: &PgRow) -> Result<Turn, DomainError> {
    let id: i64 = row
        .try_get("id_mensaje")
        .map_err(|e| db_error("read id_mensaje", e))?;
    let conversation_id: i64 = row.try_get("id_chat").map_err(|e| db_error("read id_chat", e))?;
    let sender: String = row.try_get("emisor").map_err(|e| db_error("read emisor", e))?;
    let content: String = row
        .try_get("contenido")
        .map_err(|e| db_error("read contenido", e))?;
    let sent_at: DateTime<Utc> = row.try_get("sent_at").map_err(|e| db_error("read sent_at", e))?;

    Ok(Turn {
        id: TurnId::from_raw(id),
        conversation_id: ConversationId::from_raw(conversation_id),
        sender: sender.parse()?,
        content,
        created_at: Timestamp::from_datetime(sent_at),
    })
}
