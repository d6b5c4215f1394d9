//! Model endpoint implementations

mod error;
mod traits;
mod mock;
mod ollama;
mod openai_compat;

pub use error::{EndpointError, EndpointResult};
pub use traits::{ChatEndpoint, ChatOptions};
pub use mock::{MockEndpoint, MockMode};
pub use ollama::OllamaEndpoint;
pub use openai_compat::OpenAiCompatEndpoint;
