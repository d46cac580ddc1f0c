//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - the language-model transport
//! - `TurnStore` / `TurnTransaction` - unit of work for interview exchanges
//! - `ConversationRepository` - chat management reads and writes
//! - `ReportRenderer` - evaluation report documents
//! - `SessionValidator` / `SessionIssuer` - bearer tokens
//! - `UserRepository` - registered candidates
//! - `PasswordHasher` - credential hashing

mod ai_provider;
mod conversation_repository;
mod password_hasher;
mod report_renderer;
mod session_issuer;
mod session_validator;
mod turn_store;
mod user_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_repository::ConversationRepository;
pub use password_hasher::PasswordHasher;
pub use report_renderer::{RenderError, RenderedDocument, ReportDocument, ReportRenderer};
pub use session_issuer::SessionIssuer;
pub use session_validator::SessionValidator;
pub use turn_store::{TurnStore, TurnTransaction};
pub use user_repository::UserRepository;
