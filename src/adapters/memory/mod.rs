//! In-memory adapters for tests and local development.

mod conversation_store;
mod user_store;

pub use conversation_store::InMemoryConversationStore;
pub use user_store::InMemoryUserStore;
