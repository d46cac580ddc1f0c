//! Failures of interview exchanges.

use thiserror::Error;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::domain::sanitization::{InjectionClass, InjectionDetected, SanitizedReport};
use crate::ports::{AIError, RenderError};

/// Errors surfaced by reply, report and initialization exchanges.
///
/// Every variant leaves the store as it was before the exchange started.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    /// Unknown conversation, or one owned by someone else.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Reply attempted on a completed conversation.
    #[error("Conversation {0} is completed and no longer accepts replies")]
    ConversationClosed(ConversationId),

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Message content exceeds {max} characters ({actual})")]
    ContentTooLong { max: usize, actual: usize },

    /// The candidate turn matched a prompt-injection pattern.
    #[error("Prompt injection detected ({0})")]
    InjectionDetected(InjectionClass),

    /// Report requested before the interview has enough turns.
    #[error("At least {required} messages are needed to generate a report ({actual} stored)")]
    InsufficientHistory { required: usize, actual: usize },

    /// The model transport failed or returned nothing.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(AIError),

    /// The document could not be produced. The sanitized report is kept.
    #[error("Report rendering failed: {error}")]
    RenderFailure {
        error: RenderError,
        report: Box<SanitizedReport>,
    },

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(DomainError),
}

impl ExchangeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeError::ConversationNotFound(_) => "CONVERSATION_NOT_FOUND",
            ExchangeError::ConversationClosed(_) => "CONVERSATION_CLOSED",
            ExchangeError::EmptyContent | ExchangeError::ContentTooLong { .. } => {
                "VALIDATION_FAILED"
            }
            ExchangeError::InjectionDetected(_) => "INJECTION_DETECTED",
            ExchangeError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            ExchangeError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ExchangeError::RenderFailure { .. } => "RENDER_FAILURE",
            ExchangeError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// True if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::ModelUnavailable(_)
                | ExchangeError::RenderFailure { .. }
                | ExchangeError::Storage(_)
        )
    }
}

impl From<InjectionDetected> for ExchangeError {
    fn from(err: InjectionDetected) -> Self {
        ExchangeError::InjectionDetected(err.class)
    }
}

impl From<AIError> for ExchangeError {
    fn from(err: AIError) -> Self {
        ExchangeError::ModelUnavailable(err)
    }
}

impl From<DomainError> for ExchangeError {
    fn from(err: DomainError) -> Self {
        ExchangeError::Storage(err)
    }
}

impl From<ExchangeError> for DomainError {
    fn from(err: ExchangeError) -> Self {
        let code = match &err {
            ExchangeError::ConversationNotFound(_) => ErrorCode::ConversationNotFound,
            ExchangeError::ConversationClosed(_) => ErrorCode::ConversationClosed,
            ExchangeError::Storage(inner) => return inner.clone(),
            ExchangeError::EmptyContent | ExchangeError::ContentTooLong { .. } => {
                ErrorCode::ValidationFailed
            }
            _ => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}
