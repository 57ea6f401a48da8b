//! OpenRouter gateway
//!
//! Implements [`LlmGateway`] over an OpenAI-compatible `/chat/completions`
//! endpoint. Every completion holds a permit from a shared semaphore, so the
//! number of in-flight provider calls is bounded across all requests.

use super::types::{ChatCompletionBody, SseAccumulator, parse_completion};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use tutor_application::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use tutor_domain::LlmResponse;
use tutor_domain::util::truncate_chars;

/// Provider error bodies are cut to this many characters in errors and logs.
const ERROR_BODY_MAX_CHARS: usize = 300;

pub struct OpenRouterGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    app_name: String,
    referer: Option<String>,
    permits: Arc<Semaphore>,
}

impl OpenRouterGateway {
    /// Create a gateway from the `[provider]` section.
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::RequestFailed(format!(
                "No API key: set {} or provider.api_key",
                config.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            app_name: config.app_name.clone(),
            referer: config.referer.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
        })
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<reqwest::Response, GatewayError> {
        let body = ChatCompletionBody::from_request(request);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", &self.app_name)
            .json(&body);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = truncate_chars(text.trim(), ERROR_BODY_MAX_CHARS).to_string();
        warn!(
            status = status.as_u16(),
            model = %request.model,
            body = %message,
            "Provider rejected completion"
        );
        Err(map_status(status, message))
    }

    async fn read_stream(&self, response: reqwest::Response) -> Result<LlmResponse, GatewayError> {
        let mut accumulator = SseAccumulator::new();
        // Raw bytes: a chunk may end inside a multi-byte character.
        let mut buffer: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(map_reqwest_error)?;
            buffer.extend_from_slice(&bytes);

            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                accumulator.push_line(decode_line(&line[..newline])?)?;
            }
            if accumulator.is_done() {
                break;
            }
        }
        if !buffer.is_empty() && !accumulator.is_done() {
            accumulator.push_line(decode_line(&buffer)?)?;
        }
        if !accumulator.is_done() {
            debug!("Completion stream ended without [DONE]");
        }

        Ok(accumulator.finish())
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GatewayError::Other("Gateway is shutting down".to_string()))?;

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            stream = request.stream,
            "Sending completion"
        );

        let response = self.send(&request).await?;
        if request.stream {
            self.read_stream(response).await
        } else {
            let data: serde_json::Value = response
                .json()
                .await
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
            parse_completion(&data)
        }
    }

    fn provider_name(&self) -> &str {
        "openrouter"
    }
}

fn decode_line(line: &[u8]) -> Result<&str, GatewayError> {
    std::str::from_utf8(line)
        .map_err(|e| GatewayError::InvalidResponse(format!("Stream line is not UTF-8: {}", e)))
}

fn map_status(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        s if s.is_server_error() => GatewayError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => GatewayError::RequestFailed(format!("HTTP {}: {}", s.as_u16(), message)),
    }
}

fn map_reqwest_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else if error.is_decode() || error.is_body() {
        GatewayError::InvalidResponse(error.to_string())
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}
