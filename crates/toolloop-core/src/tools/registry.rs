//! Tool registry for managing locally executable functions
//!
//! The ToolRegistry is the central component for:
//! - Registering named tools with their parameter schemas
//! - Listing descriptors to send to the model endpoint
//! - Executing tool calls and converting failures into tool-result messages

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::logging::{Logger, NoOpLogger};
use crate::types::{ChatMessage, Tool, ToolCall};
use crate::{log_error, log_info, log_warn};

/// Output of a tool handler
///
/// Non-text output is stringified before being embedded as tool-result
/// content.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

impl ToolOutput {
    /// Render the output as tool-result content
    pub fn into_content(self) -> String {
        match self {
            ToolOutput::Text(text) => text,
            ToolOutput::Json(Value::String(text)) => text,
            ToolOutput::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::Text(text.to_string())
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        ToolOutput::Json(value)
    }
}

/// Error type handlers may fail with
pub type ToolError = Box<dyn std::error::Error + Send + Sync>;

/// A locally executable function the model may request
///
/// Handlers receive the parsed argument object. They may fail; the registry
/// converts failures into tool-result messages and never propagates them.
pub trait ToolHandler: Send + Sync {
    fn call(&self, args: Value) -> Result<ToolOutput, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    fn call(&self, args: Value) -> Result<ToolOutput, ToolError> {
        self(args)
    }
}

struct RegistryEntry {
    descriptor: Tool,
    handler: Box<dyn ToolHandler>,
}

/// Registry mapping tool names to descriptors and handlers
///
/// Resolution is by exact name match. Parameter schemas are forwarded to the
/// endpoint as advisory metadata and never enforced locally.
pub struct ToolRegistry {
    entries: RwLock<Vec<RegistryEntry>>,
    logger: Arc<dyn Logger>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogger::new()))
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            logger,
        }
    }

    /// Register a tool, replacing any existing tool with the same name
    pub fn register(&self, descriptor: Tool, handler: impl ToolHandler + 'static) {
        let mut entries = self.entries.write();
        if let Some(pos) = entries.iter().position(|e| e.descriptor.name == descriptor.name) {
            log_warn!(
                self.logger,
                "[ToolRegistry] Replacing existing tool: {}",
                descriptor.name
            );
            entries.remove(pos);
        }
        entries.push(RegistryEntry {
            descriptor,
            handler: Box::new(handler),
        });
    }

    /// Register a tool backed by a closure
    pub fn register_fn<F>(&self, descriptor: Tool, handler: F)
    where
        F: Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    {
        self.register(descriptor, handler);
    }

    /// Descriptors to send to the model endpoint, in registration order
    pub fn descriptors(&self) -> Vec<Tool> {
        self.entries
            .read()
            .iter()
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .iter()
            .any(|e| e.descriptor.name == name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Execute one tool call, producing its tool-result message
    ///
    /// Never fails: malformed arguments, unknown names, and handler errors
    /// all surface as tool-result content for the model to react to.
    pub fn execute_call(&self, call: &ToolCall) -> ChatMessage {
        let args = match call.arguments.parse() {
            Ok(args) => args,
            Err(e) => {
                log_warn!(
                    self.logger,
                    "[ToolRegistry] Malformed arguments for {}: {}",
                    call.name,
                    e
                );
                return ChatMessage::tool(
                    &call.name,
                    format!("Error parsing arguments for {}: {}", call.name, e),
                );
            }
        };

        let entries = self.entries.read();
        let Some(entry) = entries.iter().find(|e| e.descriptor.name == call.name) else {
            log_warn!(self.logger, "[ToolRegistry] Unknown tool requested: {}", call.name);
            return ChatMessage::tool(&call.name, format!("Function {} not found", call.name));
        };

        log_info!(self.logger, "[ToolRegistry] Calling tool: {}", call.name);

        match entry.handler.call(args) {
            Ok(output) => ChatMessage::tool(&call.name, output.into_content()),
            Err(e) => {
                log_error!(self.logger, "[ToolRegistry] Tool {} failed: {}", call.name, e);
                ChatMessage::tool(&call.name, format!("Error executing {}: {}", call.name, e))
            }
        }
    }

    /// Execute tool calls sequentially, preserving request order
    pub fn execute_calls(&self, calls: &[ToolCall]) -> Vec<ChatMessage> {
        calls.iter().map(|call| self.execute_call(call)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolArguments;
    use serde_json::json;

    fn weather_tool() -> Tool {
        Tool::new("get_weather", "Get the current weather").with_parameters(json!({
            "type": "object",
            "properties": {"location": {"type": "string"}},
            "required": ["location"]
        }))
    }

    fn registry_with_weather() -> ToolRegistry {
        let registry = ToolRegistry::default();
        registry.register_fn(weather_tool(), |args| {
            let location = args["location"].as_str().unwrap_or("unknown");
            Ok(json!({"location": location, "temperature": 11}).into())
        });
        registry
    }

    #[test]
    fn test_register_and_descriptors() {
        let registry = registry_with_weather();

        assert!(registry.contains("get_weather"));
        assert!(!registry.contains("order_pizza"));
        assert_eq!(registry.len(), 1);

        let descriptors = registry.descriptors();
        assert_eq!(descriptors[0].name, "get_weather");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = registry_with_weather();
        registry.register_fn(weather_tool(), |_| Ok("replaced".into()));

        assert_eq!(registry.len(), 1);

        let call = ToolCall::new("get_weather", ToolArguments::Structured(json!({})));
        assert_eq!(registry.execute_call(&call).text(), Some("replaced"));
    }

    #[test]
    fn test_execute_call_success() {
        let registry = registry_with_weather();
        let call = ToolCall::new(
            "get_weather",
            ToolArguments::Structured(json!({"location": "X"})),
        );

        let msg = registry.execute_call(&call);
        assert_eq!(msg.name.as_deref(), Some("get_weather"));
        assert_eq!(msg.text(), Some(r#"{"location":"X","temperature":11}"#));
    }

    #[test]
    fn test_execute_call_accepts_string_encoded_arguments() {
        let registry = registry_with_weather();
        let call = ToolCall::new(
            "get_weather",
            ToolArguments::Text(r#"{"location": "X"}"#.to_string()),
        );

        let msg = registry.execute_call(&call);
        assert_eq!(msg.text(), Some(r#"{"location":"X","temperature":11}"#));
    }

    #[test]
    fn test_unknown_tool() {
        let registry = registry_with_weather();
        let call = ToolCall::new("order_pizza", ToolArguments::Structured(json!({})));

        let msg = registry.execute_call(&call);
        assert_eq!(msg.text(), Some("Function order_pizza not found"));
    }

    #[test]
    fn test_malformed_arguments_do_not_invoke_handler() {
        let registry = ToolRegistry::default();
        registry.register_fn(weather_tool(), |_| {
            panic!("handler must not run on malformed arguments")
        });

        let call = ToolCall::new("get_weather", ToolArguments::Text("{not json".to_string()));
        let msg = registry.execute_call(&call);

        assert!(msg.text().unwrap().starts_with("Error parsing arguments for get_weather:"));
    }

    #[test]
    fn test_failing_handler_is_reported() {
        let registry = ToolRegistry::default();
        registry.register_fn(weather_tool(), |_| Err("upstream API timed out".into()));

        let call = ToolCall::new("get_weather", ToolArguments::Structured(json!({})));
        let msg = registry.execute_call(&call);

        assert_eq!(
            msg.text(),
            Some("Error executing get_weather: upstream API timed out")
        );
    }

    #[test]
    fn test_text_output_is_not_requoted() {
        let registry = ToolRegistry::default();
        registry.register_fn(Tool::new("echo", "Echo"), |_| {
            Ok(ToolOutput::Json(Value::String("plain text".to_string())))
        });

        let call = ToolCall::new("echo", ToolArguments::Structured(json!({})));
        assert_eq!(registry.execute_call(&call).text(), Some("plain text"));
    }

    #[derive(Default)]
    struct RecordingLogger {
        messages: parking_lot::Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.messages.lock().push(format!("DEBUG {}", message));
        }
        fn info(&self, message: &str) {
            self.messages.lock().push(format!("INFO {}", message));
        }
        fn warn(&self, message: &str) {
            self.messages.lock().push(format!("WARN {}", message));
        }
        fn error(&self, message: &str) {
            self.messages.lock().push(format!("ERROR {}", message));
        }
    }

    #[test]
    fn test_registry_reports_through_injected_logger() {
        let logger = Arc::new(RecordingLogger::default());
        let registry = ToolRegistry::new(logger.clone());
        registry.register_fn(weather_tool(), |_| Ok("a".into()));
        registry.register_fn(weather_tool(), |_| Ok("b".into()));
        registry.register_fn(Tool::new("fails", "Always fails"), |_| Err("boom".into()));

        registry.execute_call(&ToolCall::new(
            "missing",
            ToolArguments::Structured(json!({})),
        ));
        registry.execute_call(&ToolCall::new("fails", ToolArguments::Structured(json!({}))));

        let messages = logger.messages.lock();
        assert!(messages
            .iter()
            .any(|m| m == "WARN [ToolRegistry] Replacing existing tool: get_weather"));
        assert!(messages
            .iter()
            .any(|m| m == "WARN [ToolRegistry] Unknown tool requested: missing"));
        assert!(messages
            .iter()
            .any(|m| m == "ERROR [ToolRegistry] Tool fails failed: boom"));
    }

    #[test]
    fn test_execute_calls_preserves_order() {
        let registry = ToolRegistry::default();
        registry.register_fn(Tool::new("first", "First"), |_| Ok("one".into()));
        registry.register_fn(Tool::new("second", "Second"), |_| Ok("two".into()));

        let calls = vec![
            ToolCall::new("second", ToolArguments::Structured(json!({}))),
            ToolCall::new("first", ToolArguments::Structured(json!({}))),
            ToolCall::new("missing", ToolArguments::Structured(json!({}))),
        ];

        let results = registry.execute_calls(&calls);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name.as_deref(), Some("second"));
        assert_eq!(results[0].text(), Some("two"));
        assert_eq!(results[1].text(), Some("one"));
        assert_eq!(results[2].text(), Some("Function missing not found"));
    }
}
