//! HTTP adapter for account endpoints (`/api/v1/auth`).

mod dto;
mod handlers;
mod routes;

pub use dto::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use handlers::AuthHandlers;
pub use routes::auth_routes;
