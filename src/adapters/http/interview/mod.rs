//! HTTP adapter for interview exchanges (`/api/v1/ai`).

mod dto;
mod handlers;
mod routes;

pub use dto::{GenerateReportRequest, InitializeRequest, ReplyRequest, ReplyResponse};
pub use handlers::{InterviewHandlers, RATING_HEADER};
pub use routes::interview_routes;
