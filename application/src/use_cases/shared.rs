//! Shared utilities for use cases.
//!
//! Retrying model invocation used by the orchestration loop.

use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use std::time::Duration;
use tracing::warn;
use tutor_domain::LlmResponse;

/// Invoke the model, retrying retryable failures up to `retries` extra times.
///
/// The delay before attempt `n` (1-based retry count) is `backoff * n`.
/// Non-retryable errors are returned immediately.
pub(crate) async fn complete_with_retry(
    gateway: &dyn LlmGateway,
    request: ChatRequest<'_>,
    retries: u32,
    backoff: Duration,
) -> Result<LlmResponse, GatewayError> {
    let mut attempt = 0u32;
    loop {
        match gateway.complete(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                warn!(
                    "{} call for {} failed ({}); retry {}/{}",
                    gateway.provider_name(),
                    request.model,
                    e,
                    attempt,
                    retries
                );
                tokio::time::sleep(backoff * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}
