//! Error responses shared by the HTTP adapters.
//!
//! Every failure is returned as JSON `{code, message}` with an optional
//! `details` object.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::handlers::{AccountError, ChatError, ExchangeError};

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Maps an exchange failure to its HTTP response.
pub fn exchange_error_response(error: ExchangeError) -> Response {
    let code = error.code();
    match error {
        ExchangeError::ConversationNotFound(_) => {
            ErrorResponse::new(code, error.to_string()).into_response_with(StatusCode::NOT_FOUND)
        }
        ExchangeError::ConversationClosed(_) => {
            ErrorResponse::new(code, error.to_string()).into_response_with(StatusCode::CONFLICT)
        }
        ExchangeError::InjectionDetected(_) => ErrorResponse::new(
            code,
            "The message contains instructions that are not allowed, rephrase your answer",
        )
        .into_response_with(StatusCode::BAD_REQUEST),
        ExchangeError::EmptyContent
        | ExchangeError::ContentTooLong { .. }
        | ExchangeError::InsufficientHistory { .. } => ErrorResponse::new(code, error.to_string())
            .into_response_with(StatusCode::UNPROCESSABLE_ENTITY),
        ExchangeError::ModelUnavailable(ref inner) => {
            tracing::warn!(error = %inner, "Model unavailable");
            ErrorResponse::new(code, "The interviewer model is unavailable, try again later")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
        ExchangeError::RenderFailure { ref error, ref report } => {
            let details = serde_json::json!({
                "report": report.text,
                "rating": report.rating.map(|r| r.label()),
            });
            ErrorResponse::new(code, format!("Report rendering failed: {}", error))
                .with_details(details)
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
        ExchangeError::Storage(ref inner) => {
            tracing::error!(error = %inner, "Storage failure during exchange");
            ErrorResponse::new(code, "Internal storage error")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Maps a chat management failure to its HTTP response.
pub fn chat_error_response(error: ChatError) -> Response {
    let code = error.code();
    match error {
        ChatError::NotFound(_) => {
            ErrorResponse::new(code, error.to_string()).into_response_with(StatusCode::NOT_FOUND)
        }
        ChatError::Validation(ref inner) => ErrorResponse::new(code, inner.to_string())
            .into_response_with(StatusCode::UNPROCESSABLE_ENTITY),
        ChatError::Storage(ref inner) => {
            tracing::error!(error = %inner, "Storage failure in chat management");
            ErrorResponse::new(code, "Internal storage error")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Maps an account failure to its HTTP response.
pub fn account_error_response(error: AccountError) -> Response {
    let code = error.code();
    match error {
        AccountError::Validation(ref inner) => ErrorResponse::new(code, inner.to_string())
            .into_response_with(StatusCode::UNPROCESSABLE_ENTITY),
        AccountError::EmailTaken => {
            ErrorResponse::new(code, error.to_string()).into_response_with(StatusCode::CONFLICT)
        }
        AccountError::InvalidCredentials => ErrorResponse::new(code, error.to_string())
            .into_response_with(StatusCode::UNAUTHORIZED),
        AccountError::UserNotFound(ref id) => {
            tracing::warn!(user_id = %id, "Session for a missing account");
            ErrorResponse::new(code, "Could not validate credentials")
                .into_response_with(StatusCode::UNAUTHORIZED)
        }
        AccountError::Session(ref inner) => {
            tracing::error!(error = %inner, "Session could not be issued");
            ErrorResponse::new(code, "Authentication service unavailable")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
        AccountError::Storage(ref inner) => {
            tracing::error!(error = %inner, "Storage failure in account handling");
            ErrorResponse::new(code, "Internal storage error")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
