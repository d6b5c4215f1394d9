//! Toolloop Core
//!
//! The function-calling / tool-use orchestration loop over pluggable chat
//! model endpoints: send a user query plus tool descriptors to a model,
//! execute the tool calls it requests, feed the results back, and repeat
//! until the model answers or the iteration budget runs out.
//!
//! ## Tool Orchestration
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolloop_core::{ChatOptions, OllamaEndpoint, Orchestrator, Tool, ToolRegistry};
//! use serde_json::json;
//!
//! let registry = ToolRegistry::default();
//! registry.register_fn(
//!     Tool::new("get_current_weather", "Get the current weather in a given location.")
//!         .with_parameters(json!({
//!             "type": "object",
//!             "properties": {"location": {"type": "string"}},
//!             "required": ["location"]
//!         })),
//!     |args| Ok(json!({"location": args["location"], "temperature": 11}).into()),
//! );
//!
//! let orchestrator = Orchestrator::new(
//!     Arc::new(OllamaEndpoint::new()),
//!     Arc::new(registry),
//!     ChatOptions::new("deepseek-r1:8b"),
//! );
//!
//! let outcome = orchestrator.run("weather in Dalian").await?;
//! println!("{}", outcome.answer);
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod endpoint;
pub mod tools;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{ChatMessage, MessageRole, Tool, ToolArguments, ToolCall};

pub use endpoint::{
    ChatEndpoint, ChatOptions, EndpointError, EndpointResult,
    MockEndpoint, OllamaEndpoint, OpenAiCompatEndpoint,
};

pub use tools::{ToolError, ToolHandler, ToolOutput, ToolRegistry};

pub use orchestrator::{
    Orchestrator, OrchestratorError, OrchestratorResult, RunOutcome, Termination,
    MAX_ITERATIONS_MARKER,
};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use config::{ConfigError, ConfigFile, ConfigResult, EndpointKind};
