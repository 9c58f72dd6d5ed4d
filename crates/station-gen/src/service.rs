use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("AI service is not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("AI service returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed AI response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Rate limits, server errors, dropped connections and unreadable answers
    /// are worth another attempt. Configuration and other client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::NotConfigured(_) => false,
            ServiceError::Transport(_) | ServiceError::Malformed(_) => true,
            ServiceError::Http { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Free-text completion.
    async fn generate_text(&self, prompt: &str) -> Result<String, ServiceError>;

    /// Completion constrained to `schema`, parsed as JSON.
    async fn generate_structured(&self, prompt: &str, schema: &Value)
    -> Result<Value, ServiceError>;
}
