//! OpenAI-compatible chat-completions endpoint adapter
//!
//! Covers hosted gateways that speak the `/chat/completions` protocol, such
//! as DashScope's compatible mode. Tool call arguments arrive JSON-encoded as
//! strings, unlike Ollama's structured objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{EndpointError, EndpointResult};
use super::traits::{ChatEndpoint, ChatOptions};
use crate::types::{ChatMessage, MessageRole, Tool, ToolArguments, ToolCall};

/// DashScope's OpenAI-compatible base URL
pub const DASHSCOPE_API_BASE: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Endpoint adapter for OpenAI-compatible chat-completions gateways
pub struct OpenAiCompatEndpoint {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl OpenAiCompatEndpoint {
    /// Create an endpoint against a compatible gateway
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Create an endpoint against DashScope's compatible mode
    pub fn dashscope() -> Self {
        Self::new(DASHSCOPE_API_BASE)
    }

    /// Set the bearer API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Get the configured API base URL
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn map_send_error(&self, err: reqwest::Error) -> EndpointError {
        if err.is_connect() || err.is_timeout() {
            EndpointError::unavailable("openai-compat", &self.api_base, err.to_string())
        } else {
            EndpointError::Http(err)
        }
    }
}

#[async_trait]
impl ChatEndpoint for OpenAiCompatEndpoint {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
        options: &ChatOptions,
    ) -> EndpointResult<ChatMessage> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EndpointError::MissingApiKey {
                endpoint: "openai-compat".to_string(),
            })?;

        let request = ChatCompletionRequest {
            model: &options.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(WireTool::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EndpointError::api_error(
                "openai-compat",
                status.as_u16(),
                message,
            ));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            EndpointError::invalid_response("openai-compat", "response carried no choices")
        })?;

        Ok(choice.message.into_chat_message())
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: MessageRole,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
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
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument string, per the chat-completions protocol
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        let arguments = match &call.arguments {
            ToolArguments::Text(raw) => raw.clone(),
            ToolArguments::Structured(value) => value.to_string(),
        };
        Self {
            kind: "function",
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
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
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
            content: self.content.filter(|c| !c.is_empty()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_reply() {
        let body = r#"{
            "choices": [
                {
                    "message": {"role": "assistant", "content": "It is 11 degrees in Dalian."},
                    "finish_reason": "stop"
                }
            ]
        }"#;

        let completion: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let message = completion.choices.into_iter().next().unwrap().message.into_chat_message();

        assert_eq!(message.text(), Some("It is 11 degrees in Dalian."));
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn test_parse_tool_call_reply_with_string_arguments() {
        let body = r#"{
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [
                            {
                                "id": "call_1",
                                "type": "function",
                                "function": {
                                    "name": "get_stock_price",
                                    "arguments": "{\"stock_symbol\": \"TSLA\"}"
                                }
                            }
                        ]
                    },
                    "finish_reason": "tool_calls"
                }
            ]
        }"#;

        let completion: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let message = completion.choices.into_iter().next().unwrap().message.into_chat_message();

        let calls = message.tool_calls.as_ref().unwrap();
        assert!(matches!(calls[0].arguments, ToolArguments::Text(_)));
        assert_eq!(calls[0].arguments.parse().unwrap()["stock_symbol"], "TSLA");
    }

    #[test]
    fn test_request_wire_format() {
        let tool = Tool::new("order_pizza", "Order a pizza").with_parameters(json!({
            "type": "object",
            "properties": {"size": {"type": "string"}},
            "required": []
        }));
        let messages = vec![
            ChatMessage::system("You are a helpful assistant."),
            ChatMessage::user("Order a large pizza"),
        ];

        let request = ChatCompletionRequest {
            model: "qwen-turbo",
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: [&tool].into_iter().map(WireTool::from).collect(),
            temperature: Some(0.5),
            max_tokens: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "qwen-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["tools"][0]["function"]["name"], "order_pizza");
        // temperature is f32 on the wire; compare in f64 after widening
        assert_eq!(body["temperature"].as_f64(), Some(f64::from(0.5f32)));
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_echoed_call_uses_string_arguments() {
        let call = ToolCall::new(
            "get_stock_price",
            ToolArguments::Structured(json!({"stock_symbol": "NVDA"})),
        );
        let wire = WireToolCall::from(&call);

        assert_eq!(wire.function.arguments, r#"{"stock_symbol":"NVDA"}"#);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let endpoint = OpenAiCompatEndpoint::dashscope();
        let result = endpoint
            .chat(
                &[ChatMessage::user("Hi")],
                &[],
                &ChatOptions::new("qwen-turbo"),
            )
            .await;

        assert!(matches!(result, Err(EndpointError::MissingApiKey { .. })));
    }

    #[test]
    fn test_no_choices_is_invalid_response() {
        let completion: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(completion.choices.is_empty());
    }
}
