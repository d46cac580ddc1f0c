//! HTTP DTOs for interview (AI) endpoints.

use serde::{Deserialize, Serialize};

use super::super::chat::MessageResponse;

/// Request to open an interview with the greeting.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeRequest {
    pub chat_id: i64,
}

/// Request carrying a candidate turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    pub chat_id: i64,
    pub contenido: String,
}

/// Request to generate the final report.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReportRequest {
    pub chat_id: i64,
}

/// Both turns of a reply exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub user_message: MessageResponse,
    pub reply: MessageResponse,
}
