//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers::{
    create_chat, delete_chat, get_chat, list_chats, list_messages, rename_chat,
    update_chat_status, ChatHandlers,
};

/// Creates the chat router, mounted under `/api/v1/chats`.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/", get(list_chats).post(create_chat))
        .route(
            "/:chat_id",
            get(get_chat).patch(rename_chat).delete(delete_chat),
        )
        .route("/:chat_id/status", patch(update_chat_status))
        .route("/:chat_id/messages", get(list_messages))
        .with_state(handlers)
}
