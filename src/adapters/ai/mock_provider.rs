//! Mock AI Provider for testing and offline development.
//!
//! - Pre-configured responses, consumed in order
//! - Error injection for rollback testing
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("¿Qué nivel de experiencia quieres simular?")
//!     .with_error(MockError::Network { message: "reset".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Reply used once the queue is exhausted.
pub const DEFAULT_MOCK_REPLY: &str =
    "Gracias por tu respuesta. ¿Podrías darme un ejemplo concreto de tu experiencia?";

/// Mock AI provider.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
    },
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-interviewer-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_response_full(content, TokenUsage::new(10, 20), FinishReason::Stop)
    }

    /// Adds a successful response with full configuration.
    pub fn with_response_full(
        self,
        content: impl Into<String>,
        usage: TokenUsage,
        finish_reason: FinishReason,
    ) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            usage,
            finish_reason,
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a response on a shared handle.
    pub fn push(&self, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns the most recent call, if any.
    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.calls.lock().ok().and_then(|c| c.last().cloned())
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_REPLY.to_string(),
                usage: TokenUsage::new(5, 10),
                finish_reason: FinishReason::Stop,
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage,
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, UserId};
    use crate::ports::{MessageRole, RequestMetadata};

    fn test_request() -> CompletionRequest {
        let metadata = RequestMetadata::new(
            UserId::new(1).unwrap(),
            ConversationId::from_raw(1),
            "trace-123",
        );
        CompletionRequest::new(metadata).with_message(MessageRole::User, "Hola")
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r1.model, "mock-interviewer-1");
        assert_eq!(r1.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let provider = MockAIProvider::new().with_response("Only one");

        provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r2.content, DEFAULT_MOCK_REPLY);
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider =
            MockAIProvider::new().with_error(MockError::RateLimited { retry_after_secs: 30 });

        let err = provider.complete(test_request()).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn records_calls() {
        let provider = MockAIProvider::new();
        assert_eq!(provider.call_count(), 0);

        provider.complete(test_request()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        let call = provider.last_call().unwrap();
        assert_eq!(call.messages[0].content, "Hola");
    }

    #[tokio::test]
    async fn clones_share_the_queue() {
        let provider = MockAIProvider::new();
        let handle = provider.clone();
        handle.push(MockResponse::Error(MockError::AuthenticationFailed));

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
        assert_eq!(handle.call_count(), 1);
    }
}
