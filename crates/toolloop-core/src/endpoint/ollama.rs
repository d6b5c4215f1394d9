//! Ollama endpoint adapter
//!
//! Talks to a local Ollama server over its native HTTP API (`/api/chat`,
//! `/api/generate`, `/api/tags`). Tool call arguments arrive already
//! structured, not JSON-encoded.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{EndpointError, EndpointResult};
use super::traits::{ChatEndpoint, ChatOptions};
use crate::types::{ChatMessage, MessageRole, Tool, ToolArguments, ToolCall};

/// Default API base for a local Ollama server
pub const DEFAULT_API_BASE: &str = "http://localhost:11434";

/// Endpoint adapter for a local Ollama server
pub struct OllamaEndpoint {
    client: reqwest::Client,
    api_base: String,
}

impl Default for OllamaEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEndpoint {
    /// Create an endpoint against the default local server
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create an endpoint against a custom base URL
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the configured API base URL
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn map_send_error(&self, err: reqwest::Error) -> EndpointError {
        if err.is_connect() || err.is_timeout() {
            EndpointError::unavailable("ollama", &self.api_base, err.to_string())
        } else {
            EndpointError::Http(err)
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> EndpointResult<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EndpointError::api_error("ollama", status.as_u16(), message));
        }
        Ok(response)
    }

    /// One-shot prompt completion via `/api/generate`
    pub async fn generate(&self, prompt: &str, model: &str) -> EndpointResult<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse = self.post("/api/generate", &request).await?.json().await?;
        Ok(response.response)
    }

    /// List the models the server has pulled, via `/api/tags`
    ///
    /// Doubles as a service health probe: an unreachable server surfaces as
    /// [`EndpointError::Unavailable`].
    pub async fn list_models(&self) -> EndpointResult<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.api_base))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EndpointError::api_error("ollama", status.as_u16(), message));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Streaming chat that concatenates text chunks into one final string
    ///
    /// The server sends newline-delimited JSON; each line carries a content
    /// fragment until `done` is true.
    pub async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> EndpointResult<String> {
        let request = ChatRequest {
            model: &options.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: Vec::new(),
            stream: true,
            options: RequestOptions::from_chat_options(options),
        };

        let response = self.post("/api/chat", &request).await?;
        let mut stream = response.bytes_stream();

        let mut buffer = Vec::new();
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(EndpointError::Http)?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let piece: StreamLine = serde_json::from_str(line)?;
                if let Some(message) = piece.message {
                    text.push_str(&message.content);
                }
                if piece.done {
                    return Ok(text);
                }
            }
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatEndpoint for OllamaEndpoint {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
        options: &ChatOptions,
    ) -> EndpointResult<ChatMessage> {
        let request = ChatRequest {
            model: &options.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(WireTool::from).collect(),
            stream: false,
            options: RequestOptions::from_chat_options(options),
        };

        let response: ChatResponse = self.post("/api/chat", &request).await?.json().await?;
        Ok(response.message.into_chat_message())
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<RequestOptions>,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl RequestOptions {
    fn from_chat_options(options: &ChatOptions) -> Option<Self> {
        if options.temperature.is_none() && options.max_tokens.is_none() {
            return None;
        }
        Some(Self {
            temperature: options.temperature,
            num_predict: options.max_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: MessageRole,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone().unwrap_or_default(),
            name: msg.name.clone(),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(WireToolCall::from).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireToolCall {
    function: WireFunctionCall,
}

#[derive(Debug, Serialize)]
struct WireFunctionCall {
    name: String,
    arguments: Value,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        // Ollama expects structured arguments when a call is echoed back
        let arguments = match &call.arguments {
            ToolArguments::Structured(value) => value.clone(),
            ToolArguments::Text(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
        };
        Self {
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a Tool,
}

impl<'a> From<&'a Tool> for WireTool<'a> {
    fn from(tool: &'a Tool) -> Self {
        Self {
            kind: "function",
            function: tool,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

impl ResponseMessage {
    fn into_chat_message(self) -> ChatMessage {
        let tool_calls: Vec<ToolCall> = self
            .tool_calls
            .into_iter()
            .map(|call| ToolCall::new(call.function.name, call.function.arguments))
            .collect();

        ChatMessage {
            role: MessageRole::Assistant,
            content: if self.content.is_empty() {
                None
            } else {
                Some(self.content)
            },
            name: None,
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    arguments: ToolArguments,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    message: Option<StreamMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    content: String,
}
