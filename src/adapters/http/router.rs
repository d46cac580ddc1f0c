//! Application router: wires the HTTP adapters to the handlers.

use std::sync::Arc;

use axum::{middleware, response::IntoResponse, routing::get, Json, Router};

use crate::application::handlers::interview::{
    GenerateReportHandler, InitializeInterviewHandler, SendReplyHandler,
};
use crate::config::InterviewConfig;
use crate::ports::{
    AIProvider, ConversationRepository, PasswordHasher, ReportRenderer, SessionIssuer,
    SessionValidator, TurnStore, UserRepository,
};

use super::auth::{auth_routes, AuthHandlers};
use super::chat::{chat_routes, ChatHandlers};
use super::interview::{interview_routes, InterviewHandlers};
use super::middleware::auth_middleware;

/// Ports the API is assembled from.
#[derive(Clone)]
pub struct AppPorts {
    pub conversations: Arc<dyn ConversationRepository>,
    pub turn_store: Arc<dyn TurnStore>,
    pub users: Arc<dyn UserRepository>,
    pub ai_provider: Arc<dyn AIProvider>,
    pub renderer: Arc<dyn ReportRenderer>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub session_issuer: Arc<dyn SessionIssuer>,
    pub session_validator: Arc<dyn SessionValidator>,
}

/// Shared state for building the API router.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthHandlers,
    pub chat: ChatHandlers,
    pub interview: InterviewHandlers,
    pub validator: Arc<dyn SessionValidator>,
}

impl AppState {
    /// Builds every handler from the configured ports.
    pub fn new(ports: AppPorts, config: &InterviewConfig) -> Self {
        let interview = InterviewHandlers::new(
            Arc::new(InitializeInterviewHandler::new(ports.turn_store.clone())),
            Arc::new(SendReplyHandler::new(
                ports.turn_store.clone(),
                ports.ai_provider.clone(),
                config.clone(),
            )),
            Arc::new(GenerateReportHandler::new(
                ports.turn_store,
                ports.ai_provider,
                ports.renderer,
                config.clone(),
            )),
        );

        Self {
            auth: AuthHandlers::new(ports.users, ports.password_hasher, ports.session_issuer),
            chat: ChatHandlers::new(ports.conversations, config),
            interview,
            validator: ports.session_validator,
        }
    }
}

/// Builds the API router. Cross-cutting layers (tracing, CORS, timeouts)
/// are added by the binary.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/api/v1/auth", auth_routes(state.auth))
        .nest("/api/v1/chats", chat_routes(state.chat))
        .nest("/api/v1/ai", interview_routes(state.interview))
        .layer(middleware::from_fn_with_state(state.validator, auth_middleware));

    Router::new().route("/health", get(health)).merge(api)
}

/// GET /health - Liveness check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
