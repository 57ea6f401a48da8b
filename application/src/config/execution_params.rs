//! Execution parameters: loop and request control.
//!
//! [`ExecutionParams`] groups the static parameters that bound one query:
//! how many tool rounds, how long the whole request may take, how the model
//! call is retried and how long answers may be. These are application-layer
//! concerns, not domain policy.

use std::time::Duration;
use tutor_domain::{Platform, TurnLimits, core::question::DEFAULT_MAX_QUESTION_CHARS};

/// Query execution control parameters.
///
/// | Platform | Request timeout | Max tokens |
/// |----------|-----------------|------------|
/// | whatsapp | 20 s | 1200 |
/// | others   | 30 s | 2000 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionParams {
    /// Maximum ToolDispatch rounds per request.
    pub max_tool_turns: usize,
    /// Overall deadline for web and other channels.
    pub request_timeout: Duration,
    /// Overall deadline for WhatsApp, whose webhook gives up earlier.
    pub whatsapp_timeout: Duration,
    /// Extra attempts for retryable model failures.
    pub model_retries: u32,
    /// Base delay between model attempts (multiplied by the attempt number).
    pub retry_backoff: Duration,
    /// Completion budget for web and other channels.
    pub max_tokens: u32,
    /// Completion budget for messaging channels.
    pub messaging_max_tokens: u32,
    /// Cap on the sanitized question, in characters.
    pub max_question_chars: usize,
    /// Cap on the `webSearchContext` excerpt, in characters.
    pub context_max_chars: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_turns: TurnLimits::DEFAULT_MAX_TOOL_TURNS,
            request_timeout: Duration::from_secs(30),
            whatsapp_timeout: Duration::from_secs(20),
            model_retries: 1,
            retry_backoff: Duration::from_millis(500),
            max_tokens: 2000,
            messaging_max_tokens: 1200,
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
            context_max_chars: tutor_domain::query::format::DEFAULT_CONTEXT_MAX_CHARS,
        }
    }
}

impl ExecutionParams {
    pub fn turn_limits(&self) -> TurnLimits {
        TurnLimits::new(self.max_tool_turns)
    }

    pub fn timeout_for(&self, platform: &Platform) -> Duration {
        match platform {
            Platform::Whatsapp => self.whatsapp_timeout,
            _ => self.request_timeout,
        }
    }

    pub fn max_tokens_for(&self, platform: &Platform) -> u32 {
        if platform.is_messaging() {
            self.messaging_max_tokens
        } else {
            self.max_tokens
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_whatsapp_timeout(mut self, timeout: Duration) -> Self {
        self.whatsapp_timeout = timeout;
        self
    }

    pub fn with_model_retries(mut self, retries: u32) -> Self {
        self.model_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_tokens(mut self, web: u32, messaging: u32) -> Self {
        self.max_tokens = web;
        self.messaging_max_tokens = messaging;
        self
    }

    pub fn with_max_question_chars(mut self, max: usize) -> Self {
        self.max_question_chars = max;
        self
    }

    pub fn with_context_max_chars(mut self, max: usize) -> Self {
        self.context_max_chars = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_tool_turns, 4);
        assert_eq!(params.model_retries, 1);
        assert_eq!(params.max_question_chars, 1000);
        assert_eq!(params.context_max_chars, 1000);
    }

    #[test]
    fn test_platform_dependent_limits() {
        let params = ExecutionParams::default();
        assert_eq!(params.timeout_for(&Platform::Whatsapp), Duration::from_secs(20));
        assert_eq!(params.timeout_for(&Platform::Web), Duration::from_secs(30));
        assert_eq!(
            params.timeout_for(&Platform::Other("telegram".into())),
            Duration::from_secs(30)
        );
        assert_eq!(params.max_tokens_for(&Platform::Whatsapp), 1200);
        assert_eq!(params.max_tokens_for(&Platform::Discord), 1200);
        assert_eq!(params.max_tokens_for(&Platform::Web), 2000);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_tool_turns(2)
            .with_request_timeout(Duration::from_secs(5))
            .with_model_retries(0);

        assert_eq!(params.turn_limits(), TurnLimits::new(2));
        assert_eq!(params.request_timeout, Duration::from_secs(5));
        assert_eq!(params.model_retries, 0);
    }
}
