//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! timeout_seconds = 8
//! max_concurrent_calls = 4
//! summary_max_chars = 2000
//!
//! [tools.web_search]
//! enabled = true
//!
//! [tools.news]
//! enabled = true
//! max_results = 5
//!
//! [tools.wikipedia]
//! enabled = true
//! language = "pt"
//! max_results = 2
//! ```

use crate::tools::ToolSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Per-call deadline; must be shorter than the request timeouts.
    pub timeout_seconds: u64,
    /// Concurrent calls per tool, shared by all requests.
    pub max_concurrent_calls: usize,
    /// Tool output cap, in characters.
    pub summary_max_chars: usize,
    pub user_agent: String,
    pub web_search: FileWebSearchConfig,
    /// Headline search; shares `web_search.endpoint`
    pub news: FileNewsConfig,
    pub wikipedia: FileWikipediaConfig,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            max_concurrent_calls: 4,
            summary_max_chars: 2000,
            user_agent: concat!("school-tutor/", env!("CARGO_PKG_VERSION")).to_string(),
            web_search: FileWebSearchConfig::default(),
            news: FileNewsConfig::default(),
            wikipedia: FileWikipediaConfig::default(),
        }
    }
}

impl FileToolsConfig {
    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings {
            timeout: Duration::from_secs(self.timeout_seconds),
            max_concurrent_calls: self.max_concurrent_calls,
            summary_max_chars: self.summary_max_chars,
        }
    }

    /// Whether any tool is enabled.
    pub fn any_enabled(&self) -> bool {
        self.web_search.enabled || self.news.enabled || self.wikipedia.enabled
    }
}

/// DuckDuckGo Instant Answer search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWebSearchConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for FileWebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

/// DuckDuckGo headline search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNewsConfig {
    pub enabled: bool,
    /// Headlines returned when the model does not ask for a count
    pub max_results: usize,
}

impl Default for FileNewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: 5,
        }
    }
}

/// Wikipedia summary search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWikipediaConfig {
    pub enabled: bool,
    /// Wikipedia language edition (`pt` → pt.wikipedia.org)
    pub language: String,
    /// Titles returned by the opensearch fallback
    pub max_results: usize,
}

impl Default for FileWikipediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "pt".to_string(),
            max_results: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tool_settings() {
        assert_eq!(FileToolsConfig::default().tool_settings(), ToolSettings::default());
    }

    #[test]
    fn test_disable_one_tool() {
        let config: FileToolsConfig =
            toml::from_str("timeout_seconds = 5\n[web_search]\nenabled = false").unwrap();
        assert_eq!(config.tool_settings().timeout, Duration::from_secs(5));
        assert!(!config.web_search.enabled);
        assert!(config.wikipedia.enabled);
        assert!(config.any_enabled());
    }

    #[test]
    fn test_all_tools_disabled() {
        let config: FileToolsConfig = toml::from_str(
            "[web_search]\nenabled = false\n[news]\nenabled = false\n[wikipedia]\nenabled = false",
        )
        .unwrap();
        assert!(!config.any_enabled());

        let news_only: FileToolsConfig =
            toml::from_str("[web_search]\nenabled = false\n[wikipedia]\nenabled = false").unwrap();
        assert!(news_only.any_enabled());
        assert_eq!(news_only.news.max_results, 5);
    }
}
