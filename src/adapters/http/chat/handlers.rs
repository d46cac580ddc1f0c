//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{chat_error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::chat::{
    ChatError, CreateChatCommand, CreateChatHandler, DeleteChatCommand, DeleteChatHandler,
    GetChatHandler, GetChatQuery, ListChatsHandler, ListChatsQuery, ListMessagesHandler,
    ListMessagesQuery, RenameChatCommand, RenameChatHandler, SetChatStatusCommand,
    SetChatStatusHandler,
};
use crate::config::InterviewConfig;
use crate::domain::foundation::ConversationId;
use crate::domain::interview::ConversationStatus;
use crate::ports::ConversationRepository;

use super::dto::{
    ChatResponse, CreateChatRequest, CreateChatResponse, ListMessagesParams, MessageResponse,
    RenameChatRequest, UpdateChatStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    create_handler: Arc<CreateChatHandler>,
    list_handler: Arc<ListChatsHandler>,
    get_handler: Arc<GetChatHandler>,
    rename_handler: Arc<RenameChatHandler>,
    delete_handler: Arc<DeleteChatHandler>,
    status_handler: Arc<SetChatStatusHandler>,
    messages_handler: Arc<ListMessagesHandler>,
}

impl ChatHandlers {
    /// Builds every chat handler over one repository.
    pub fn new(repository: Arc<dyn ConversationRepository>, config: &InterviewConfig) -> Self {
        Self {
            create_handler: Arc::new(CreateChatHandler::new(repository.clone())),
            list_handler: Arc::new(ListChatsHandler::new(repository.clone())),
            get_handler: Arc::new(GetChatHandler::new(repository.clone())),
            rename_handler: Arc::new(RenameChatHandler::new(repository.clone())),
            delete_handler: Arc::new(DeleteChatHandler::new(repository.clone())),
            status_handler: Arc::new(SetChatStatusHandler::new(repository.clone())),
            messages_handler: Arc::new(ListMessagesHandler::new(repository, config)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/chats - Create a chat
pub async fn create_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<CreateChatRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let cmd = CreateChatCommand {
        owner: user.id,
        title: req.title,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(conversation) => (
            StatusCode::CREATED,
            Json(CreateChatResponse {
                id_chat: conversation.id.value(),
            }),
        )
            .into_response(),
        Err(e) => chat_error_response(e),
    }
}

/// GET /api/v1/chats - List the caller's chats
pub async fn list_chats(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.list_handler.handle(ListChatsQuery { owner: user.id }).await {
        Ok(chats) => {
            let response: Vec<ChatResponse> = chats.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => chat_error_response(e),
    }
}

/// GET /api/v1/chats/:chat_id - Chat details
pub async fn get_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(chat_id): Path<String>,
) -> Response {
    let conversation_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetChatQuery {
        owner: user.id,
        conversation_id,
    };
    respond_with_chat(handlers.get_handler.handle(query).await)
}

/// PATCH /api/v1/chats/:chat_id - Rename a chat
pub async fn rename_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(chat_id): Path<String>,
    Json(req): Json<RenameChatRequest>,
) -> Response {
    let conversation_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RenameChatCommand {
        owner: user.id,
        conversation_id,
        title: req.title,
    };
    respond_with_chat(handlers.rename_handler.handle(cmd).await)
}

/// PATCH /api/v1/chats/:chat_id/status - Force a status change
pub async fn update_chat_status(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(chat_id): Path<String>,
    Json(req): Json<UpdateChatStatusRequest>,
) -> Response {
    let conversation_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let status = match req.status.parse::<ConversationStatus>() {
        Ok(status) => status,
        Err(e) => return chat_error_response(ChatError::Validation(e)),
    };

    let cmd = SetChatStatusCommand {
        owner: user.id,
        conversation_id,
        status,
    };
    respond_with_chat(handlers.status_handler.handle(cmd).await)
}

/// DELETE /api/v1/chats/:chat_id - Delete a chat and its messages
pub async fn delete_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(chat_id): Path<String>,
) -> Response {
    let conversation_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeleteChatCommand {
        owner: user.id,
        conversation_id,
    };
    match handlers.delete_handler.handle(cmd).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => chat_error_response(e),
    }
}

/// GET /api/v1/chats/:chat_id/messages - Messages, newest first
pub async fn list_messages(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(chat_id): Path<String>,
    Query(params): Query<ListMessagesParams>,
) -> Response {
    let conversation_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = ListMessagesQuery {
        owner: user.id,
        conversation_id,
        limit: params.limit,
    };
    match handlers.messages_handler.handle(query).await {
        Ok(turns) => {
            let response: Vec<MessageResponse> = turns.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => chat_error_response(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_chat_id(raw: &str) -> Result<ConversationId, Response> {
    raw.parse::<ConversationId>().map_err(|_| {
        ErrorResponse::bad_request("Invalid chat ID").into_response_with(StatusCode::BAD_REQUEST)
    })
}

fn respond_with_chat(
    result: Result<crate::domain::interview::Conversation, ChatError>,
) -> Response {
    match result {
        Ok(conversation) => {
            let response: ChatResponse = conversation.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => chat_error_response(e),
    }
}
