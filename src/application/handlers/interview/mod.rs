//! Interview exchange handlers.
//!
//! - `SendReplyHandler` - candidate turn plus interviewer answer, atomically
//! - `GenerateReportHandler` - final evaluation report, closes the interview
//! - `InitializeInterviewHandler` - opening greeting

mod errors;
mod generate_report;
mod history;
mod initialize_interview;
pub mod prompts;
mod send_reply;

pub use errors::ExchangeError;
pub use generate_report::{GenerateReportCommand, GenerateReportHandler, GenerateReportResult};
pub use history::build_history;
pub use initialize_interview::{
    InitializeInterviewCommand, InitializeInterviewHandler, InitializeInterviewResult,
};
pub use send_reply::{SendReplyCommand, SendReplyHandler, SendReplyResult};
