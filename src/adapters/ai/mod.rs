//! AI Provider Adapters.
//!
//! - `OpenAICompatibleProvider` - chat-completions HTTP API
//! - `MockAIProvider` - configurable mock for tests and offline development

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_REPLY};
pub use openai_provider::{OpenAICompatibleProvider, OpenAIConfig};
