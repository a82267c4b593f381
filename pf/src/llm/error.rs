//! LLM error types

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM API key not found. Set the {0} environment variable.")]
    MissingApiKey(String),

    #[error("Unknown LLM provider: '{0}'. Supported: gemini")]
    UnknownProvider(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl LlmError {
    /// True when the error comes from local setup rather than the remote service
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LlmError::MissingApiKey(_) | LlmError::UnknownProvider(_) | LlmError::Template(_)
        )
    }
}
