//! Failures of conversation management operations.

use thiserror::Error;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, ValidationError};

/// Errors from chat management handlers.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Unknown conversation, or one owned by someone else.
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(DomainError),
}

impl ChatError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::NotFound(_) => "CONVERSATION_NOT_FOUND",
            ChatError::Validation(_) => "VALIDATION_FAILED",
            ChatError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err.code() {
            ErrorCode::ValidationFailed => {
                ChatError::Validation(ValidationError::invalid_format("request", err.message))
            }
            _ => ChatError::Storage(err),
        }
    }
}
