//! PDF report renderer backed by Pandoc.
//!
//! The HTML document from [`HtmlReportRenderer`] is piped into a `pandoc`
//! subprocess which writes the PDF to stdout. Pandoc must be installed.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::ports::{RenderError, RenderedDocument, ReportDocument, ReportRenderer};

use super::html_renderer::HtmlReportRenderer;

/// Converts reports to PDF through Pandoc.
#[derive(Debug, Clone)]
pub struct PandocPdfRenderer {
    html: HtmlReportRenderer,
    pandoc_path: String,
    pdf_engine: Option<String>,
    timeout: Duration,
}

impl PandocPdfRenderer {
    pub fn new(pandoc_path: impl Into<String>) -> Self {
        Self {
            html: HtmlReportRenderer::new(),
            pandoc_path: pandoc_path.into(),
            pdf_engine: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Select the PDF engine (e.g. `wkhtmltopdf`, `weasyprint`).
    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = Some(engine.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn arguments(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-f", "html", "-t", "pdf", "-o", "-"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(engine) = &self.pdf_engine {
            args.push(format!("--pdf-engine={}", engine));
        }
        args
    }

    async fn convert(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.pandoc_path)
            .args(self.arguments())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => RenderError::ToolNotFound(self.pandoc_path.clone()),
                _ => RenderError::from(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
            // Closing stdin lets pandoc start converting
            drop(stdin);
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::ConversionFailed(stderr.trim().to_string()));
        }
        if output.stdout.is_empty() {
            return Err(RenderError::ConversionFailed("pandoc produced no output".into()));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl ReportRenderer for PandocPdfRenderer {
    async fn render(&self, document: &ReportDocument) -> Result<RenderedDocument, RenderError> {
        let html = self.html.to_html(document);
        let started = std::time::Instant::now();

        let bytes = self.convert(&html).await.map_err(|e| {
            tracing::error!(error = %e, pandoc = %self.pandoc_path, "PDF conversion failed");
            e
        })?;

        tracing::debug!(
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "PDF rendered"
        );
        Ok(RenderedDocument::new(bytes, "application/pdf", "pdf"))
    }
}
