//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which transport to use
    #[serde(default)]
    pub provider: AiProvider,

    /// API key for the OpenAI-compatible endpoint
    pub api_key: Option<String>,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat-completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    /// Canned replies, for local development without a model.
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProvider::OpenAI && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::OpenAI);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_openai_requires_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );

        let empty_key = AiConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_key.validate().is_err());
    }

    #[test]
    fn test_mock_needs_no_key() {
        let config = AiConfig {
            provider: AiProvider::Mock,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_openai_config() {
        let config = AiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.has_api_key());
        assert!(config.validate().is_ok());
    }
}
