//! Report renderer port - turns a sanitized report into a document.
//!
//! Renderers are pure with respect to the domain: they receive finished
//! text plus header values and return bytes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::sanitization::{ReportFacts, SanitizedReport};

/// Port for rendering evaluation reports.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Renders the document.
    async fn render(&self, document: &ReportDocument) -> Result<RenderedDocument, RenderError>;
}

/// Everything printed in an evaluation report.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Candidate shown in the header.
    pub candidate_name: String,
    /// Interview date and extracted parameters.
    pub facts: ReportFacts,
    /// Narrative body and employability banner value.
    pub report: SanitizedReport,
}

/// Output of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// File extension without the dot.
    pub extension: String,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
            extension: extension.into(),
        }
    }
}

/// Errors that can occur while rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// External converter binary is missing.
    #[error("Renderer tool not found: {0}")]
    ToolNotFound(String),

    /// The converter ran but failed.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    /// The converter did not finish in time.
    #[error("Rendering timed out after {0} seconds")]
    Timeout(u64),

    /// I/O error talking to the converter.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_displays_reason() {
        assert_eq!(
            RenderError::ToolNotFound("pandoc".into()).to_string(),
            "Renderer tool not found: pandoc"
        );
        assert_eq!(RenderError::Timeout(30).to_string(), "Rendering timed out after 30 seconds");
    }

    #[test]
    fn io_errors_convert() {
        let err: RenderError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
