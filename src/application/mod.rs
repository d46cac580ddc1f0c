//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Interview exchanges run through a `TurnTransaction`; chat management goes
//! straight to the `ConversationRepository`.

pub mod handlers;

pub use handlers::*;
