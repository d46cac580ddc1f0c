//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - language-model transports (OpenAI-compatible, mock)
//! - `auth` - session token validation (JWT, mock)
//! - `document` - report renderers (HTML, Pandoc PDF)
//! - `http` - axum REST API
//! - `memory` - in-process conversation store
//! - `postgres` - PostgreSQL conversation store

pub mod ai;
pub mod auth;
pub mod document;
pub mod http;
pub mod memory;
pub mod postgres;
