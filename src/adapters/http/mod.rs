//! HTTP adapters - REST API implementations.
//!
//! - `auth` - registration, login and session lookup under `/api/v1/auth`
//! - `chat` - conversation management under `/api/v1/chats`
//! - `interview` - reply, report and greeting exchanges under `/api/v1/ai`
//! - `middleware` - bearer token authentication
//! - `router` - `AppState` and the assembled API router

pub mod auth;
pub mod chat;
pub mod error;
pub mod interview;
pub mod middleware;
mod router;

pub use error::ErrorResponse;
pub use router::{api_router, AppPorts, AppState};
