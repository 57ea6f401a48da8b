//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use tutor_domain::{LlmResponse, Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request rejected: {0}")]
    RequestFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Unparseable response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Transient failures worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_)
                | GatewayError::RateLimited(_)
                | GatewayError::ServerError { .. }
                | GatewayError::InvalidResponse(_)
                | GatewayError::Timeout
        )
    }
}

/// One model invocation.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    /// Provider model id (possibly an online variant)
    pub model: &'a Model,
    /// Conversation so far
    pub messages: &'a [Message],
    /// Tool declarations in provider JSON format; empty means no tools
    pub tools: &'a [serde_json::Value],
    pub max_tokens: u32,
    /// Ask the provider to stream the completion
    pub stream: bool,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one completion over the transcript
    async fn complete(&self, request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str {
        "llm"
    }
}
