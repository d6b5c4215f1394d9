//! Endpoint trait definition

use async_trait::async_trait;

use super::error::EndpointResult;
use crate::types::{ChatMessage, Tool};

/// Options for a chat request
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Model identifier as used by the endpoint's API
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    /// Create options for a model with defaults
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// A model endpoint consulted for both free-text and tool-call decisions
///
/// Each backend (Ollama, OpenAI-compatible gateway, mock) implements this
/// trait. The response is a single assistant message that either carries
/// plain text or requests one or more tool invocations.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Get the endpoint name (e.g., "ollama", "openai-compat")
    fn name(&self) -> &str;

    /// Send a conversation plus tool descriptors, returning the assistant reply
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
        options: &ChatOptions,
    ) -> EndpointResult<ChatMessage>;
}
