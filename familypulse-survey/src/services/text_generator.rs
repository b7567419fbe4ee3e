//! Generative-text service boundary
//!
//! Adapters talk to the external service only through [`TextGenerator`], so
//! the HTTP client can be replaced by a stub in tests.

use serde_json::Value;
use thiserror::Error;

/// One prompt sent to the generative-text service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the service must reply with JSON matching this schema
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    /// Free-form prose reply
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    /// JSON reply constrained by `schema`
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// Transport or service failure talking to the generative-text service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API key (HTTP {0})")]
    InvalidApiKey(u16),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Anything that can turn a prompt into text
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Send one prompt and return the reply text (possibly empty)
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
