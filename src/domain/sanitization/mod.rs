//! Sanitization module - deterministic text guards around the model.
//!
//! - `input` - prompt-injection screening of candidate turns
//! - `report` - corrective passes over the generated evaluation report

pub mod input;
pub mod report;

pub use input::{InjectionClass, InjectionDetected, InputSanitizer, MAX_USER_CONTENT_CHARS};
pub use report::{ReportFacts, ReportSanitizer, SanitizedReport};
