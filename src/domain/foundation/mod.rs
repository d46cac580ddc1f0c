//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, auth types and error types
//! that form the vocabulary of the Evalio domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConversationId, TurnId, UserId};
pub use timestamp::Timestamp;
