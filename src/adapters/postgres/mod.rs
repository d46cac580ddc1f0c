//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresConversationStore` - `ConversationRepository` and `TurnStore`
//!   over the `chats` and `mensajes` tables
//! - `PostgresUserStore` - `UserRepository` over the `users` table

mod conversation_store;
mod user_store;

pub use conversation_store::{PostgresConversationStore, PostgresTurnTransaction};
pub use user_store::PostgresUserStore;
