//! Weather lookup via the tool-call loop against a local Ollama server.
//!
//! Run with: cargo run --example weather

use std::sync::Arc;

use serde_json::json;
use toolloop_core::{
    ChatOptions, ConsoleLogger, OllamaEndpoint, Orchestrator, Tool, ToolRegistry,
};

fn get_current_weather(location: &str) -> serde_json::Value {
    // Canned data, same shape a real weather API would return
    let temperature = match location {
        l if l.contains("Dalian") => 11,
        l if l.contains("Shanghai") => 36,
        l if l.contains("Shenzhen") => 37,
        l if l.contains("Beijing") => 15,
        _ => -1,
    };
    json!({
        "location": location,
        "temperature": temperature,
        "unit": "celsius",
        "forecast": ["sunny", "breezy"],
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = OllamaEndpoint::new();

    // Make sure the server is reachable before starting the loop
    let models = endpoint.list_models().await?;
    println!("Available models: {:?}", models);

    let registry = ToolRegistry::default();
    registry.register_fn(
        Tool::new(
            "get_current_weather",
            "Get the current weather in a given location.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city, e.g. Dalian or Shanghai"
                },
                "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
            },
            "required": ["location"]
        })),
        |args| {
            let location = args["location"].as_str().unwrap_or("unknown");
            Ok(get_current_weather(location).into())
        },
    );

    let orchestrator = Orchestrator::new(
        Arc::new(endpoint),
        Arc::new(registry),
        ChatOptions::new("deepseek-r1:8b"),
    )
    .with_logger(Arc::new(ConsoleLogger::new()));

    let outcome = orchestrator.run("What is the weather like in Dalian?").await?;
    println!("{}", outcome.answer);
    Ok(())
}
