//! Model provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completions provider (OpenRouter by default).
///
/// ```toml
/// [provider]
/// base_url = "https://openrouter.ai/api/v1"
/// api_key_env = "OPENROUTER_API_KEY"
/// timeout_seconds = 25
/// max_concurrent_requests = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-call HTTP timeout.
    pub timeout_seconds: u64,
    /// Concurrent completions across all requests.
    pub max_concurrent_requests: usize,
    /// Sent as `X-Title` for provider-side attribution.
    pub app_name: String,
    /// Sent as `HTTP-Referer` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 25,
            max_concurrent_requests: 16,
            app_name: "school-tutor".to_string(),
            referer: None,
        }
    }
}

impl FileProviderConfig {
    /// The configured key, or the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-direct".to_string()),
            api_key_env: "TUTOR_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));
    }

    #[test]
    fn test_missing_key() {
        let config = FileProviderConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "TUTOR_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
