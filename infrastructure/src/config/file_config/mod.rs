//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application types
//! at wiring time.

mod execution;
mod grounding;
mod logging;
mod models;
mod provider;
mod schools;
mod server;
mod tools;

pub use execution::FileExecutionConfig;
pub use grounding::FileGroundingConfig;
pub use logging::FileLoggingConfig;
pub use models::{FileModelEntry, FileModelsConfig};
pub use provider::FileProviderConfig;
pub use schools::FileSchoolConfig;
pub use server::FileServerConfig;
pub use tools::{FileNewsConfig, FileToolsConfig, FileWebSearchConfig, FileWikipediaConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error(
        "tools.timeout_seconds ({tool}s) must be shorter than the shortest request timeout ({request}s)"
    )]
    ToolTimeoutTooLong { tool: u64, request: u64 },

    #[error("{field}: model name cannot be empty")]
    EmptyModelName { field: String },

    #[error("default model '{0}' is not in the model catalog")]
    DefaultModelNotInCatalog(String),

    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    /// Chat-completions provider
    pub provider: FileProviderConfig,
    /// Model catalog and default
    pub models: FileModelsConfig,
    /// Loop and request limits
    pub execution: FileExecutionConfig,
    pub grounding: FileGroundingConfig,
    pub tools: FileToolsConfig,
    /// School context by `schoolId`
    pub schools: BTreeMap<String, FileSchoolConfig>,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let timeouts = [
            ("execution.request_timeout_seconds", self.execution.request_timeout_seconds),
            ("execution.whatsapp_timeout_seconds", self.execution.whatsapp_timeout_seconds),
            ("tools.timeout_seconds", self.tools.timeout_seconds),
            ("provider.timeout_seconds", self.provider.timeout_seconds),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                errors.push(ConfigValidationError::InvalidTimeout { field });
            }
        }

        let shortest = self.execution.shortest_timeout_seconds();
        if self.tools.timeout_seconds > 0 && shortest > 0 && self.tools.timeout_seconds >= shortest {
            errors.push(ConfigValidationError::ToolTimeoutTooLong {
                tool: self.tools.timeout_seconds,
                request: shortest,
            });
        }

        let limits = [
            ("provider.max_concurrent_requests", self.provider.max_concurrent_requests),
            ("tools.max_concurrent_calls", self.tools.max_concurrent_calls),
            ("tools.summary_max_chars", self.tools.summary_max_chars),
            ("execution.max_question_chars", self.execution.max_question_chars),
        ];
        for (field, value) in limits {
            if value == 0 {
                errors.push(ConfigValidationError::ZeroLimit { field });
            }
        }

        if let Err(e) = self.models.to_registry() {
            errors.push(e);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
port = 9000

[provider]
api_key_env = "MY_KEY"

[models]
default = "openai/gpt-4o-mini"

[execution]
max_tool_turns = 3
whatsapp_timeout_seconds = 15

[grounding]
policy = "model"

[tools]
timeout_seconds = 5

[tools.wikipedia]
language = "en"

[schools.esc-1]
name = "Escola Secundária de Viseu"
context = "10.º ano"

[logging]
dir = "/tmp/tutor-logs"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.api_key_env, "MY_KEY");
        assert_eq!(config.models.default.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(config.execution.max_tool_turns, 3);
        assert_eq!(config.execution.request_timeout_seconds, 30);
        assert_eq!(config.grounding.policy, tutor_domain::GroundingPolicyKind::Model);
        assert_eq!(config.tools.wikipedia.language, "en");
        assert!(config.tools.web_search.enabled);
        assert_eq!(config.schools["esc-1"].context, "10.º ano");
        assert!(config.logging.dir.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let mut config = FileConfig::default();
        config.execution.request_timeout_seconds = 0;
        config.tools.max_concurrent_calls = 0;
        config.models.default = Some("acme/missing".to_string());

        let errors = config.validate();
        assert!(errors.contains(&ConfigValidationError::InvalidTimeout {
            field: "execution.request_timeout_seconds"
        }));
        assert!(errors.contains(&ConfigValidationError::ZeroLimit {
            field: "tools.max_concurrent_calls"
        }));
        assert!(errors.contains(&ConfigValidationError::DefaultModelNotInCatalog(
            "acme/missing".to_string()
        )));
    }

    #[test]
    fn test_tool_timeout_must_be_shorter_than_request() {
        let mut config = FileConfig::default();
        config.tools.timeout_seconds = 20;

        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::ToolTimeoutTooLong {
                tool: 20,
                request: 20
            }]
        );
    }

    #[test]
    fn test_school_prompt_context() {
        let school = FileSchoolConfig {
            name: "Escola Básica de Braga".to_string(),
            context: "5.º ao 9.º ano".to_string(),
        };
        assert_eq!(
            school.prompt_context().as_deref(),
            Some("Escola: Escola Básica de Braga\n5.º ao 9.º ano")
        );
        assert!(FileSchoolConfig::default().prompt_context().is_none());
    }
}
