//! Interview exchange parameters

use serde::Deserialize;

use super::error::ValidationError;

/// Parameters of reply and report exchanges.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Turns sent to the model for a reply
    #[serde(default = "default_reply_history_window")]
    pub reply_history_window: usize,

    /// Output budget for a reply
    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    /// Turns sent to the model for the final report
    #[serde(default = "default_report_history_window")]
    pub report_history_window: usize,

    /// Turns required before a report can be generated
    #[serde(default = "default_report_min_turns")]
    pub report_min_turns: usize,

    /// Output budget for the final report
    #[serde(default = "default_report_max_tokens")]
    pub report_max_tokens: u32,

    /// Sampling temperature for both exchanges
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff for both exchanges
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Earliest turns inspected when extracting interview metadata
    #[serde(default = "default_extraction_window")]
    pub extraction_window: usize,

    /// Longest accepted candidate turn, in characters
    #[serde(default = "default_max_user_content_chars")]
    pub max_user_content_chars: usize,

    /// Page size of the message listing when none is requested
    #[serde(default = "default_messages_page_size")]
    pub messages_page_size: usize,

    /// Largest message listing page
    #[serde(default = "default_messages_page_max")]
    pub messages_page_max: usize,
}

impl InterviewConfig {
    /// Validate exchange parameters
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reply_history_window == 0 || self.report_history_window == 0 {
            return Err(ValidationError::InvalidInterviewSetting("history windows must be positive"));
        }
        if self.report_min_turns > self.report_history_window {
            return Err(ValidationError::InvalidInterviewSetting(
                "report_min_turns exceeds report_history_window",
            ));
        }
        if self.reply_max_tokens == 0 || self.report_max_tokens == 0 {
            return Err(ValidationError::InvalidInterviewSetting("token budgets must be positive"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidInterviewSetting("temperature must be within 0..=2"));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ValidationError::InvalidInterviewSetting("top_p must be within (0, 1]"));
        }
        if self.max_user_content_chars == 0 {
            return Err(ValidationError::InvalidInterviewSetting(
                "max_user_content_chars must be positive",
            ));
        }
        if self.messages_page_size == 0 || self.messages_page_size > self.messages_page_max {
            return Err(ValidationError::InvalidInterviewSetting(
                "messages_page_size must be within 1..=messages_page_max",
            ));
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            reply_history_window: default_reply_history_window(),
            reply_max_tokens: default_reply_max_tokens(),
            report_history_window: default_report_history_window(),
            report_min_turns: default_report_min_turns(),
            report_max_tokens: default_report_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            extraction_window: default_extraction_window(),
            max_user_content_chars: default_max_user_content_chars(),
            messages_page_size: default_messages_page_size(),
            messages_page_max: default_messages_page_max(),
        }
    }
}

fn default_reply_history_window() -> usize {
    50
}

fn default_reply_max_tokens() -> u32 {
    200
}

fn default_report_history_window() -> usize {
    100
}

fn default_report_min_turns() -> usize {
    5
}

fn default_report_max_tokens() -> u32 {
    2500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_extraction_window() -> usize {
    crate::domain::interview::DEFAULT_EXTRACTION_WINDOW
}

fn default_max_user_content_chars() -> usize {
    crate::domain::sanitization::MAX_USER_CONTENT_CHARS
}

fn default_messages_page_size() -> usize {
    50
}

fn default_messages_page_max() -> usize {
    100
}
