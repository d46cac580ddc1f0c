//! HTML report renderer.
//!
//! The report body is Markdown produced by the model and cleaned by the
//! report sanitizer. It is converted with pulldown-cmark; raw HTML in the
//! body is emitted as text. Header values come from `ReportFacts` and are
//! escaped.

use async_trait::async_trait;
use pulldown_cmark::{html, Event, Options, Parser};

use crate::ports::{RenderError, RenderedDocument, ReportDocument, ReportRenderer};

/// Footer line printed on every report.
pub const REPORT_FOOTER: &str =
    "Evalio - Simulador de entrevistas técnicas para Formación Profesional";

/// Renders reports as standalone HTML documents.
#[derive(Debug, Clone)]
pub struct HtmlReportRenderer {
    include_default_css: bool,
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReportRenderer {
    pub fn new() -> Self {
        Self {
            include_default_css: true,
        }
    }

    /// Disable the embedded stylesheet.
    pub fn without_default_css(mut self) -> Self {
        self.include_default_css = false;
        self
    }

    /// Builds the complete HTML document.
    pub fn to_html(&self, document: &ReportDocument) -> String {
        let facts = &document.facts;
        let css = if self.include_default_css { DEFAULT_CSS } else { "" };

        let banner = document
            .report
            .rating
            .map(|rating| {
                format!(
                    "<div class=\"empleabilidad\"><div>Nivel de Empleabilidad</div>\
                     <div class=\"empleabilidad-nivel\">{}</div></div>\n",
                    html_escape(rating.label())
                )
            })
            .unwrap_or_default();

        let rows = [
            ("Candidato", document.candidate_name.as_str()),
            ("Fecha", facts.interview_date.as_str()),
            ("Rol simulado", facts.role.as_str()),
            ("Nivel académico", facts.academic_level.as_str()),
            ("Ciclo formativo", facts.cycle.as_str()),
            ("Duración", facts.duration.as_str()),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                "<div class=\"metadata-row\"><span class=\"metadata-label\">{}:</span> \
                 <span class=\"metadata-value\">{}</span></div>",
                label,
                html_escape(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<title>Informe de Entrevista Técnica - {candidate}</title>
<style>
{css}
</style>
</head>
<body>
<div class="header">
<h1>Informe de Entrevista Técnica</h1>
<div class="subtitle">Simulador Evalio - Formación Profesional</div>
</div>
<div class="metadata">
{rows}
</div>
{banner}<div class="section">
{body}</div>
<div class="footer">
<p>{footer}</p>
</div>
</body>
</html>
"#,
            candidate = html_escape(&document.candidate_name),
            css = css,
            rows = rows,
            banner = banner,
            body = markdown_to_html(&document.report.text),
            footer = REPORT_FOOTER,
        )
    }
}

#[async_trait]
impl ReportRenderer for HtmlReportRenderer {
    async fn render(&self, document: &ReportDocument) -> Result<RenderedDocument, RenderError> {
        let html = self.to_html(document);
        Ok(RenderedDocument::new(
            html.into_bytes(),
            "text/html; charset=utf-8",
            "html",
        ))
    }
}

/// Converts the report body, demoting raw HTML to text.
fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const DEFAULT_CSS: &str = r#"
body {
    font-family: 'Helvetica Neue', Arial, sans-serif;
    font-size: 11pt;
    line-height: 1.6;
    color: #1e293b;
    max-width: 800px;
    margin: 0 auto;
    padding: 2rem;
}
.header { text-align: center; border-bottom: 3px solid #2563eb; margin-bottom: 1.5rem; }
.header h1 { color: #1e40af; margin-bottom: 0.25rem; }
.subtitle { color: #64748b; margin-bottom: 1rem; }
.metadata { background: #f1f5f9; border-radius: 6px; padding: 1rem; margin-bottom: 1.5rem; }
.metadata-label { font-weight: 600; color: #334155; }
.empleabilidad {
    text-align: center;
    background: #eff6ff;
    border: 2px solid #2563eb;
    border-radius: 8px;
    padding: 1rem;
    margin: 1.5rem 0;
    font-weight: 600;
}
.empleabilidad-nivel { font-size: 18pt; color: #1e40af; }
h2 { color: #1e40af; border-bottom: 1px solid #e2e8f0; padding-bottom: 0.25rem; }
blockquote { border-left: 4px solid #2563eb; margin: 1em 0; padding: 0.5em 1em; background: #f8fafc; }
.footer {
    margin-top: 2rem;
    padding-top: 1rem;
    border-top: 2px solid #e2e8f0;
    text-align: center;
    font-size: 9pt;
    color: #64748b;
}
"#;
