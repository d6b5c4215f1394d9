//! Mock endpoint for testing
//!
//! Provides deterministic, configurable replies without network dependencies,
//! and records every request it receives so tests can assert on call counts
//! and transcripts.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::error::{EndpointError, EndpointResult};
use super::traits::{ChatEndpoint, ChatOptions};
use crate::types::{ChatMessage, Tool, ToolCall};

/// Mock reply mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return the same text reply on every call
    Fixed(String),
    /// Replay a scripted sequence of assistant messages, in order
    Script(Vec<ChatMessage>),
    /// Request the same tool calls on every turn (never terminates on its own)
    AlwaysCalls(Vec<ToolCall>),
    /// Fail every call as if the service were unreachable
    Unavailable,
}

/// Mock model endpoint for testing
pub struct MockEndpoint {
    mode: MockMode,
    script: Mutex<VecDeque<ChatMessage>>,
    /// Transcripts received, one entry per chat call
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockEndpoint {
    /// Create a mock with a specific mode
    pub fn with_mode(mode: MockMode) -> Self {
        let script = match &mode {
            MockMode::Script(messages) => messages.clone().into(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a fixed text-reply endpoint
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self::with_mode(MockMode::Fixed(reply.into()))
    }

    /// Create a scripted endpoint that replays `messages` in order
    pub fn scripted(messages: Vec<ChatMessage>) -> Self {
        Self::with_mode(MockMode::Script(messages))
    }

    /// Create an endpoint that requests the same tool calls on every turn
    pub fn always_calls(calls: Vec<ToolCall>) -> Self {
        Self::with_mode(MockMode::AlwaysCalls(calls))
    }

    /// Create an endpoint that is never reachable
    pub fn unavailable() -> Self {
        Self::with_mode(MockMode::Unavailable)
    }

    /// Number of chat calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Transcripts received, one per chat call
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatEndpoint for MockEndpoint {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        _tools: &[Tool],
        _options: &ChatOptions,
    ) -> EndpointResult<ChatMessage> {
        self.requests.lock().push(messages.to_vec());

        match &self.mode {
            MockMode::Fixed(reply) => Ok(ChatMessage::assistant(reply.clone())),
            MockMode::Script(_) => self.script.lock().pop_front().ok_or_else(|| {
                EndpointError::invalid_response("mock", "scripted replies exhausted")
            }),
            MockMode::AlwaysCalls(calls) => Ok(ChatMessage::assistant_with_calls(calls.clone())),
            MockMode::Unavailable => Err(EndpointError::unavailable(
                "mock",
                "http://localhost:0/mock",
                "connection refused",
            )),
        }
    }
}
