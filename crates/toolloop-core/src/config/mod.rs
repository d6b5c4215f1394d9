//! File-based configuration (YAML)
//!
//! Reads run settings from `~/.config/toolloop/config.yaml` or an explicit
//! path. API keys are never stored in the file; the config only names the
//! environment variable to read them from.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::endpoint::{ChatEndpoint, ChatOptions, OllamaEndpoint, OpenAiCompatEndpoint};

/// Which endpoint adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointKind {
    /// Local Ollama server
    #[serde(rename = "ollama")]
    Ollama,
    /// OpenAI-compatible chat-completions gateway (DashScope and similar)
    #[serde(rename = "openai-compat")]
    OpenAiCompat,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Endpoint adapter to use
    #[serde(default = "default_endpoint")]
    pub endpoint: EndpointKind,
    /// Model identifier as used by the endpoint's API
    #[serde(default = "default_model")]
    pub model: String,
    /// Custom API base URL (adapter default if not set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Iteration budget for orchestration runs
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// System prompt prepended to every run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_endpoint() -> EndpointKind {
    EndpointKind::Ollama
}

fn default_model() -> String {
    "deepseek-r1:8b".to_string()
}

fn default_api_key_env() -> String {
    "DASHSCOPE_API_KEY".to_string()
}

fn default_max_iterations() -> usize {
    5
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_base: None,
            api_key_env: default_api_key_env(),
            max_iterations: default_max_iterations(),
            temperature: None,
            system_prompt: None,
        }
    }
}

impl ConfigFile {
    /// Default config path (~/.config/toolloop/config.yaml)
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("toolloop").join("config.yaml")
    }

    /// Load config from a specific file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from the default path, falling back to defaults when the
    /// file does not exist
    pub fn load_default() -> ConfigResult<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save config to a specific file
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// Build the chat request options described by this config
    pub fn chat_options(&self) -> ChatOptions {
        let mut options = ChatOptions::new(&self.model);
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        options
    }

    /// Build the endpoint adapter described by this config
    pub fn build_endpoint(&self) -> Arc<dyn ChatEndpoint> {
        match self.endpoint {
            EndpointKind::Ollama => match &self.api_base {
                Some(base) => Arc::new(OllamaEndpoint::with_api_base(base)),
                None => Arc::new(OllamaEndpoint::new()),
            },
            EndpointKind::OpenAiCompat => {
                let mut endpoint = match &self.api_base {
                    Some(base) => OpenAiCompatEndpoint::new(base),
                    None => OpenAiCompatEndpoint::dashscope(),
                };
                if let Some(key) = self.api_key() {
                    endpoint = endpoint.with_api_key(key);
                }
                Arc::new(endpoint)
            }
        }
    }
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
