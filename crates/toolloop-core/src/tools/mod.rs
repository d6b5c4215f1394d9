//! Tool registration and execution

mod registry;

pub use registry::{ToolError, ToolHandler, ToolOutput, ToolRegistry};
