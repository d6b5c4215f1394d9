//! Core types for tool-calling conversations
//!
//! This module contains the shared types used across endpoints.

mod message;
mod tool;

pub use message::{ChatMessage, MessageRole};
pub use tool::{Tool, ToolArguments, ToolCall};
