//! Document adapters - implementations of the `ReportRenderer` port.
//!
//! - `HtmlReportRenderer` - Markdown body to HTML with pulldown-cmark
//! - `PandocPdfRenderer` - the same HTML converted to PDF by Pandoc

mod html_renderer;
mod pandoc_renderer;

pub use html_renderer::{HtmlReportRenderer, REPORT_FOOTER};
pub use pandoc_renderer::PandocPdfRenderer;
