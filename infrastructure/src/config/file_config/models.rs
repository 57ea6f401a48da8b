//! Model catalog configuration from TOML (`[models]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use tutor_domain::{Model, ModelEntry, ModelRegistry};

/// Model catalog
///
/// An empty catalog means the built-in one.
///
/// ```toml
/// [models]
/// default = "deepseek/deepseek-chat"
///
/// [[models.catalog]]
/// id = "deepseek/deepseek-chat"
/// online_variant = "deepseek/deepseek-chat:online"
///
/// [[models.catalog]]
/// id = "qwen/qwen2.5-vl-7b-instruct"
/// supports_tools = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model used when the request names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub catalog: Vec<FileModelEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModelEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_variant: Option<String>,
    #[serde(default = "default_true")]
    pub supports_tools: bool,
}

fn default_true() -> bool {
    true
}

impl FileModelsConfig {
    /// Build the registry, falling back to the built-in catalog.
    pub fn to_registry(&self) -> Result<ModelRegistry, ConfigValidationError> {
        let default = match self.default.as_deref() {
            Some(id) if id.trim().is_empty() => {
                return Err(ConfigValidationError::EmptyModelName {
                    field: "models.default".to_string(),
                });
            }
            Some(id) => Some(Model::new(id.trim())),
            None => None,
        };

        let entries = if self.catalog.is_empty() {
            ModelRegistry::builtin().entries().cloned().collect()
        } else {
            self.catalog
                .iter()
                .enumerate()
                .map(|(i, entry)| entry.to_entry(i))
                .collect::<Result<Vec<_>, _>>()?
        };

        let default = default.unwrap_or_else(Model::default);
        ModelRegistry::new(entries, default.clone()).map_err(|_| {
            ConfigValidationError::DefaultModelNotInCatalog(default.to_string())
        })
    }
}

impl FileModelEntry {
    fn to_entry(&self, index: usize) -> Result<ModelEntry, ConfigValidationError> {
        if self.id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName {
                field: format!("models.catalog[{}].id", index),
            });
        }
        let mut entry = ModelEntry::new(self.id.trim());
        match self.online_variant.as_deref().map(str::trim) {
            Some("") => {
                return Err(ConfigValidationError::EmptyModelName {
                    field: format!("models.catalog[{}].online_variant", index),
                });
            }
            Some(online) => entry = entry.with_online_variant(online),
            None => {}
        }
        if !self.supports_tools {
            entry = entry.without_tools();
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_uses_builtin() {
        let registry = FileModelsConfig::default().to_registry().unwrap();
        assert_eq!(registry.default_model().as_str(), "deepseek/deepseek-chat");
        assert!(registry.contains("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_custom_catalog() {
        let config: FileModelsConfig = toml::from_str(
            r#"
default = "openai/gpt-4o-mini"

[[catalog]]
id = "openai/gpt-4o-mini"
online_variant = "openai/gpt-4o-mini:online"

[[catalog]]
id = "local/vision"
supports_tools = false
"#,
        )
        .unwrap();

        let registry = config.to_registry().unwrap();
        assert_eq!(registry.default_model().as_str(), "openai/gpt-4o-mini");
        let selection = registry.resolve(None, true).unwrap();
        assert_eq!(selection.resolved_model.as_str(), "openai/gpt-4o-mini:online");
        assert!(!registry.get("local/vision").unwrap().supports_tools);
        assert!(!registry.contains("deepseek/deepseek-chat"));
    }

    #[test]
    fn test_default_must_be_in_catalog() {
        let config = FileModelsConfig {
            default: Some("acme/missing".to_string()),
            catalog: vec![],
        };
        assert!(matches!(
            config.to_registry(),
            Err(ConfigValidationError::DefaultModelNotInCatalog(id)) if id == "acme/missing"
        ));
    }

    #[test]
    fn test_empty_catalog_id_rejected() {
        let config = FileModelsConfig {
            default: None,
            catalog: vec![FileModelEntry {
                id: " ".to_string(),
                online_variant: None,
                supports_tools: true,
            }],
        };
        assert!(matches!(
            config.to_registry(),
            Err(ConfigValidationError::EmptyModelName { .. })
        ));
    }
}
