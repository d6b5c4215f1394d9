//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for function calling
///
/// The `parameters` schema is advisory metadata forwarded to the model so it
/// can shape its call requests; it is never enforced locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
        }
    }

    /// Set the parameter schema
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }
}

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool being called
    pub name: String,
    /// Input arguments, as returned by the endpoint
    pub arguments: ToolArguments,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Arguments attached to a tool call
///
/// Endpoints disagree about the encoding: OpenAI-compatible gateways return a
/// JSON-encoded string, Ollama returns an already-structured object. Both are
/// accepted and normalized exactly once via [`ToolArguments::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    /// JSON-encoded argument string, e.g. `"{\"location\": \"Dalian\"}"`
    Text(String),
    /// Already-structured argument object
    Structured(Value),
}

impl ToolArguments {
    /// Normalize the arguments into a structured value
    ///
    /// Text arguments are parsed as JSON; structured arguments are used as-is.
    pub fn parse(&self) -> Result<Value, serde_json::Error> {
        match self {
            ToolArguments::Text(raw) => serde_json::from_str(raw),
            ToolArguments::Structured(value) => Ok(value.clone()),
        }
    }
}

impl From<Value> for ToolArguments {
    fn from(value: Value) -> Self {
        ToolArguments::Structured(value)
    }
}

impl From<&str> for ToolArguments {
    fn from(raw: &str) -> Self {
        ToolArguments::Text(raw.to_string())
    }
}
