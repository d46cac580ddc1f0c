//! HTTP adapter for chat management endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatResponse, CreateChatRequest, CreateChatResponse, ListMessagesParams, MessageResponse,
    RenameChatRequest, UpdateChatStatusRequest,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
