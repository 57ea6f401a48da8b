//! Query execution configuration from TOML (`[execution]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_application::ExecutionParams;

/// Loop and request limits
///
/// ```toml
/// [execution]
/// max_tool_turns = 4
/// request_timeout_seconds = 30
/// whatsapp_timeout_seconds = 20
/// model_retries = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_tool_turns: usize,
    pub request_timeout_seconds: u64,
    pub whatsapp_timeout_seconds: u64,
    pub model_retries: u32,
    pub retry_backoff_ms: u64,
    pub max_tokens: u32,
    pub messaging_max_tokens: u32,
    pub max_question_chars: usize,
    pub context_max_chars: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_tool_turns: params.max_tool_turns,
            request_timeout_seconds: params.request_timeout.as_secs(),
            whatsapp_timeout_seconds: params.whatsapp_timeout.as_secs(),
            model_retries: params.model_retries,
            retry_backoff_ms: params.retry_backoff.as_millis() as u64,
            max_tokens: params.max_tokens,
            messaging_max_tokens: params.messaging_max_tokens,
            max_question_chars: params.max_question_chars,
            context_max_chars: params.context_max_chars,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_tool_turns(self.max_tool_turns)
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
            .with_whatsapp_timeout(Duration::from_secs(self.whatsapp_timeout_seconds))
            .with_model_retries(self.model_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_max_tokens(self.max_tokens, self.messaging_max_tokens)
            .with_max_question_chars(self.max_question_chars)
            .with_context_max_chars(self.context_max_chars)
    }

    /// Shortest overall deadline across platforms.
    pub fn shortest_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
            .min(self.whatsapp_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        assert_eq!(
            FileExecutionConfig::default().to_execution_params(),
            ExecutionParams::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config: FileExecutionConfig = toml::from_str("max_tool_turns = 2\nmodel_retries = 0").unwrap();
        let params = config.to_execution_params();
        assert_eq!(params.max_tool_turns, 2);
        assert_eq!(params.model_retries, 0);
        assert_eq!(params.request_timeout, Duration::from_secs(30));
    }
}
