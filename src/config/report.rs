//! Report rendering configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Report rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Output format of generated reports
    #[serde(default)]
    pub format: ReportFormat,

    /// Path to the pandoc binary
    #[serde(default = "default_pandoc_path")]
    pub pandoc_path: String,

    /// PDF engine passed to pandoc, if any
    pub pdf_engine: Option<String>,

    /// Conversion timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Report output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Html,
}

impl ReportConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate report configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.format == ReportFormat::Pdf && self.pandoc_path.trim().is_empty() {
            return Err(ValidationError::InvalidReportSetting("pandoc_path is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidReportSetting("timeout must be positive"));
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            pandoc_path: default_pandoc_path(),
            pdf_engine: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_pandoc_path() -> String {
    "pandoc".to_string()
}

fn default_timeout() -> u64 {
    60
}
