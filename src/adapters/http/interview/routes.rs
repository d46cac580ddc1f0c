//! HTTP routes for interview endpoints.

use axum::{routing::post, Router};

use super::handlers::{generate_report, initialize, reply, InterviewHandlers};

/// Creates the interview router, mounted under `/api/v1/ai`.
pub fn interview_routes(handlers: InterviewHandlers) -> Router {
    Router::new()
        .route("/initialize", post(initialize))
        .route("/reply", post(reply))
        .route("/generate-report", post(generate_report))
        .with_state(handlers)
}
