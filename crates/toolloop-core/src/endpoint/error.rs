//! Endpoint error types

use thiserror::Error;

/// Errors that can occur while talking to a model endpoint
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The endpoint cannot be reached at all
    #[error("{endpoint} is unavailable at {api_base}: {message}")]
    Unavailable {
        endpoint: String,
        api_base: String,
        message: String,
    },

    /// Missing API key
    #[error("API key is required for {endpoint}")]
    MissingApiKey { endpoint: String },

    /// API request failed with a status code
    #[error("{endpoint} API error ({status}): {message}")]
    ApiError {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid response from the endpoint
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
}

impl EndpointError {
    /// Create an unavailable error
    pub fn unavailable(
        endpoint: impl Into<String>,
        api_base: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            endpoint: endpoint.into(),
            api_base: api_base.into(),
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api_error(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

pub type EndpointResult<T> = Result<T, EndpointError>;
