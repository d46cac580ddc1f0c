//! HTTP handlers for interview endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::exchange_error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::interview::{
    GenerateReportCommand, GenerateReportHandler, GenerateReportResult,
    InitializeInterviewCommand, InitializeInterviewHandler, SendReplyCommand, SendReplyHandler,
};
use crate::domain::foundation::ConversationId;

use super::super::chat::MessageResponse;
use super::dto::{GenerateReportRequest, InitializeRequest, ReplyRequest, ReplyResponse};

/// Header carrying the employability level of a generated report.
pub const RATING_HEADER: &str = "x-employability-rating";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InterviewHandlers {
    initialize_handler: Arc<InitializeInterviewHandler>,
    reply_handler: Arc<SendReplyHandler>,
    report_handler: Arc<GenerateReportHandler>,
}

impl InterviewHandlers {
    pub fn new(
        initialize_handler: Arc<InitializeInterviewHandler>,
        reply_handler: Arc<SendReplyHandler>,
        report_handler: Arc<GenerateReportHandler>,
    ) -> Self {
        Self {
            initialize_handler,
            reply_handler,
            report_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/ai/initialize - Store the opening greeting
pub async fn initialize(
    State(handlers): State<InterviewHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<InitializeRequest>,
) -> Response {
    let cmd = InitializeInterviewCommand {
        user_id: user.id,
        conversation_id: ConversationId::from_raw(req.chat_id),
    };

    match handlers.initialize_handler.handle(cmd).await {
        Ok(result) => {
            let status = if result.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(MessageResponse::from(result.turn))).into_response()
        }
        Err(e) => exchange_error_response(e),
    }
}

/// POST /api/v1/ai/reply - Candidate turn plus interviewer answer
pub async fn reply(
    State(handlers): State<InterviewHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<ReplyRequest>,
) -> Response {
    let cmd = SendReplyCommand {
        user_id: user.id,
        conversation_id: ConversationId::from_raw(req.chat_id),
        content: req.contenido,
    };

    match handlers.reply_handler.handle(cmd).await {
        Ok(result) => {
            let response = ReplyResponse {
                user_message: result.user_turn.into(),
                reply: result.model_turn.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => exchange_error_response(e),
    }
}

/// POST /api/v1/ai/generate-report - Final report as a download
pub async fn generate_report(
    State(handlers): State<InterviewHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<GenerateReportRequest>,
) -> Response {
    let cmd = GenerateReportCommand {
        user_id: user.id,
        conversation_id: ConversationId::from_raw(req.chat_id),
        candidate_name: user.candidate_name().to_string(),
    };

    match handlers.report_handler.handle(cmd).await {
        Ok(result) => report_response(result),
        Err(e) => exchange_error_response(e),
    }
}

fn report_response(result: GenerateReportResult) -> Response {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, CONTENT_TYPE, &result.document.content_type);
    insert_header(
        &mut headers,
        CONTENT_DISPOSITION,
        &format!("attachment; filename=\"{}\"", result.filename),
    );
    if let Some(rating) = result.report.rating {
        insert_header(
            &mut headers,
            HeaderName::from_static(RATING_HEADER),
            rating.label(),
        );
    }

    (StatusCode::OK, headers, result.document.bytes).into_response()
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!(header = %name, "Dropping header with invalid value"),
    }
}
