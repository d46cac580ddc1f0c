//! OpenAI-compatible provider - `AIProvider` over the chat-completions API.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` wire format.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAICompatibleProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    /// Model identifier.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Chat-completions provider.
pub struct OpenAICompatibleProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAICompatibleProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(prompt.clone()),
            });
        }

        for msg in &request.messages {
            messages.push(ChatMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            });
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&self.to_wire_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses onto `AIError`.
    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 | 404 | 422 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses "try again in Ns" out of a rate-limit body, defaulting to 30s.
    fn parse_retry_after(error_body: &str) -> u32 {
        serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
                let idx = message.find("try again in ")?;
                let digits: String = message[idx + 13..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse::<u32>().ok()
            })
            .unwrap_or(30)
    }

    async fn parse_response(response: Response) -> Result<CompletionResponse, AIError> {
        let response = Self::handle_response_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Self::into_completion(body)
    }

    fn into_completion(body: ChatResponse) -> Result<CompletionResponse, AIError> {
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        if finish_reason == FinishReason::ContentFilter {
            return Err(AIError::content_filtered("completion blocked by provider filter"));
        }

        let usage = body
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: body.model,
            finish_reason,
        })
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(request).await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl AIProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let started = Instant::now();
        let mut retry_count = 0;

        loop {
            match self.attempt(&request).await {
                Ok(completion) => {
                    tracing::debug!(
                        conversation_id = %request.metadata.conversation_id,
                        trace_id = %request.metadata.trace_id,
                        model = %completion.model,
                        prompt_tokens = completion.usage.prompt_tokens,
                        completion_tokens = completion.usage.completion_tokens,
                        latency_ms = started.elapsed().as_millis() as u64,
                        "Completion received"
                    );
                    return Ok(completion);
                }
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        tracing::warn!(
                            conversation_id = %request.metadata.conversation_id,
                            trace_id = %request.metadata.trace_id,
                            attempts = retry_count + 1,
                            error = %err,
                            "Completion failed"
                        );
                        return Err(err);
                    }

                    // Exponential backoff: 1s, 2s, 4s, ...
                    let delay = Duration::from_secs(1 << retry_count);
                    tracing::debug!(
                        trace_id = %request.metadata.trace_id,
                        retry = retry_count + 1,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "Retrying completion"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, UserId};
    use crate::ports::{Message, RequestMetadata};

    fn provider() -> OpenAICompatibleProvider {
        OpenAICompatibleProvider::new(OpenAIConfig::new("test-key")).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            UserId::new(1).unwrap(),
            ConversationId::from_raw(3),
            "trace",
        ))
        .with_system_prompt("Eres un entrevistador")
        .with_messages(vec![Message::user("Hola"), Message::assistant("¿Qué rol?")])
        .with_max_tokens(200)
        .with_temperature(0.7)
        .with_top_p(0.9)
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let config = OpenAIConfig::new("sk-secret-value");
        assert!(!format!("{:?}", config).contains("sk-secret-value"));
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let provider = OpenAICompatibleProvider::new(
            OpenAIConfig::new("k").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(provider.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn wire_request_puts_system_prompt_first() {
        let wire = provider().to_wire_request(&request());
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][2]["role"], "assistant");
        assert_eq!(json["max_tokens"], 200);
        assert!((json["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn wire_request_omits_unset_sampling() {
        let bare = CompletionRequest::new(RequestMetadata::new(
            UserId::new(1).unwrap(),
            ConversationId::from_raw(3),
            "trace",
        ));
        let json = serde_json::to_value(provider().to_wire_request(&bare)).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn parses_completion_body() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"model":"gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"¿Junior, Middle o Senior?"},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":8}}"#,
        )
        .unwrap();

        let completion = OpenAICompatibleProvider::into_completion(body).unwrap();
        assert_eq!(completion.content, "¿Junior, Middle o Senior?");
        assert_eq!(completion.usage.total_tokens, 20);
        assert_eq!(completion.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":null},"finish_reason":"length"}]}"#,
        )
        .unwrap();

        let completion = OpenAICompatibleProvider::into_completion(body).unwrap();
        assert!(completion.content.is_empty());
        assert_eq!(completion.finish_reason, FinishReason::Length);
    }

    #[test]
    fn content_filter_is_an_error() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":""},"finish_reason":"content_filter"}]}"#,
        )
        .unwrap();

        let err = OpenAICompatibleProvider::into_completion(body).unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
    }

    #[test]
    fn empty_choices_is_a_parse_error() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"model":"m","choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAICompatibleProvider::into_completion(body),
            Err(AIError::Parse(_))
        ));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit reached. Please try again in 20s."}}"#;
        assert_eq!(OpenAICompatibleProvider::parse_retry_after(error), 20);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(OpenAICompatibleProvider::parse_retry_after("not json"), 30);
    }

    #[test]
    fn provider_info_reports_model() {
        let info = provider().provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4o-mini");
    }
}
