//! Conversation management handlers.
//!
//! Plain owner-scoped CRUD over `ConversationRepository`.

mod create_chat;
mod delete_chat;
mod errors;
mod get_chat;
mod list_chats;
mod list_messages;
mod rename_chat;
mod set_chat_status;

pub use create_chat::{CreateChatCommand, CreateChatHandler};
pub use delete_chat::{DeleteChatCommand, DeleteChatHandler};
pub use errors::ChatError;
pub use get_chat::{GetChatHandler, GetChatQuery};
pub use list_chats::{ListChatsHandler, ListChatsQuery};
pub use list_messages::{ListMessagesHandler, ListMessagesQuery};
pub use rename_chat::{RenameChatCommand, RenameChatHandler};
pub use set_chat_status::{SetChatStatusCommand, SetChatStatusHandler};
