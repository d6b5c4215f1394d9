//! Chat message types

use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// A tool result being reported back to the model
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in a conversation transcript
///
/// A message with `role = tool` carries the name of the tool whose result it
/// reports. An assistant message carrying `tool_calls` is a request for tool
/// invocations, not a final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: MessageRole,
    /// The text content of the message (may be absent on tool-call turns)
    pub content: Option<String>,
    /// Name of the tool this message reports a result for (role = tool only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool invocations requested by the model (role = assistant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
            name: None,
            tool_calls: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
            name: None,
            tool_calls: None,
        }
    }

    /// Create a plain-text assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(content.into()),
            name: None,
            tool_calls: None,
        }
    }

    /// Create an assistant message requesting tool invocations
    pub fn assistant_with_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            name: None,
            tool_calls: Some(calls),
        }
    }

    /// Create a tool-result message for the named tool
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            name: Some(name.into()),
            tool_calls: None,
        }
    }

    /// Get the text content, if any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether this message requests one or more tool invocations
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tool::ToolArguments;
    use serde_json::json;

    #[test]
    fn test_chat_message_creation() {
        let sys = ChatMessage::system("You are helpful");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.text(), Some("You are helpful"));

        let user = ChatMessage::user("Hello");
        assert_eq!(user.role, MessageRole::User);
        assert!(!user.has_tool_calls());

        let tool = ChatMessage::tool("get_weather", "{\"temperature\": 11}");
        assert_eq!(tool.role, MessageRole::Tool);
        assert_eq!(tool.name.as_deref(), Some("get_weather"));
    }

    #[test]
    fn test_assistant_with_calls_is_not_final() {
        let msg = ChatMessage::assistant_with_calls(vec![ToolCall::new(
            "get_weather",
            ToolArguments::Structured(json!({"location": "Dalian"})),
        )]);

        assert!(msg.has_tool_calls());
        assert_eq!(msg.text(), None);
    }

    #[test]
    fn test_empty_call_list_is_final() {
        let mut msg = ChatMessage::assistant("done");
        msg.tool_calls = Some(vec![]);
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Hello\""));
        assert!(!json.contains("tool_calls"));
    }

    #[test]
    fn test_tool_message_serialization_carries_name() {
        let msg = ChatMessage::tool("get_stock_price", "{\"price\": \"$200\"}");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"tool\""));
        assert!(json.contains("\"name\":\"get_stock_price\""));
    }
}
