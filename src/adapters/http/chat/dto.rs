//! HTTP DTOs for chat endpoints.
//!
//! Field names follow the public API (`id_chat`, `emisor`, `contenido`).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::interview::{Conversation, ConversationStatus, Sender, Turn};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a chat. The title is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request to rename a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// Request to change a chat's status (`active` or `completed`).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChatStatusRequest {
    pub status: String,
}

/// Query parameters for listing messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for chat creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateChatResponse {
    pub id_chat: i64,
}

/// Chat details.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub id_chat: i64,
    pub id_usuario: i64,
    pub title: String,
    pub status: ConversationStatus,
    pub created_at: String,
    pub last_message_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<Conversation> for ChatResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id_chat: conversation.id.value(),
            id_usuario: conversation.owner_id.value(),
            status: conversation.status(),
            completed_at: conversation.completed_at().map(rfc3339),
            created_at: rfc3339(conversation.created_at),
            last_message_at: rfc3339(conversation.last_message_at),
            title: conversation.title,
        }
    }
}

/// One stored turn.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id_mensaje: i64,
    pub id_chat: i64,
    pub emisor: Sender,
    pub contenido: String,
    pub sent_at: String,
}

impl From<Turn> for MessageResponse {
    fn from(turn: Turn) -> Self {
        Self {
            id_mensaje: turn.id.value(),
            id_chat: turn.conversation_id.value(),
            emisor: turn.sender,
            contenido: turn.content,
            sent_at: rfc3339(turn.created_at),
        }
    }
}

fn rfc3339(ts: Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}
