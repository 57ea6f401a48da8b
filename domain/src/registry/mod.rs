//! Model registry: maps requested model ids to invocation parameters.
//!
//! The registry is an explicit catalog. Each [`ModelEntry`] names its base id
//! and, when the provider offers one, the **online variant** that performs
//! live web retrieval on the provider side:
//!
//! ```text
//! deepseek/deepseek-chat  ──online──▶  deepseek/deepseek-chat:online
//! openai/gpt-4o-mini      ──online──▶  openai/gpt-4o-mini:online
//! anthropic/claude-3.5-haiku           (no online variant: tool calling)
//! ```
//!
//! Substitution is a table lookup, never string concatenation, so the
//! resolution of any request is auditable from configuration alone.
//!
//! # Resolution policy
//!
//! 1. No model requested → the configured default
//! 2. Grounding needed and the base has an online variant → substitute it
//! 3. Otherwise keep the base model; grounding goes through tool calls
//!
//! Unknown identifiers fail closed with [`DomainError::UnknownModel`].

use crate::core::{error::DomainError, model::Model};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A model known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Base model id (e.g. `deepseek/deepseek-chat`)
    pub id: Model,
    /// Online counterpart performing provider-side web retrieval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_variant: Option<Model>,
    /// Whether the model accepts tool declarations
    #[serde(default = "default_true")]
    pub supports_tools: bool,
}

fn default_true() -> bool {
    true
}

impl ModelEntry {
    pub fn new(id: impl Into<Model>) -> Self {
        Self {
            id: id.into(),
            online_variant: None,
            supports_tools: true,
        }
    }

    pub fn with_online_variant(mut self, variant: impl Into<Model>) -> Self {
        self.online_variant = Some(variant.into());
        self
    }

    pub fn without_tools(mut self) -> Self {
        self.supports_tools = false;
        self
    }
}

/// Outcome of model resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSelection {
    /// The catalog entry the request resolved to
    pub base_model: Model,
    /// The id actually sent to the provider
    pub resolved_model: Model,
    /// Whether the provider performs live retrieval itself
    pub grounding_enabled: bool,
    /// Whether tool declarations may be offered to this model
    pub supports_tools: bool,
}

impl ModelSelection {
    /// Whether tool declarations go out with the completion.
    ///
    /// Never for online variants, which retrieve on their own, nor for
    /// models without tool support.
    pub fn offers_tools(&self, policy_allows_tools: bool) -> bool {
        policy_allows_tools && self.supports_tools && !self.grounding_enabled
    }
}

/// Explicit catalog of models and their online variants.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: BTreeMap<String, ModelEntry>,
    /// Online variant id → base id
    online_index: BTreeMap<String, String>,
    default_model: Model,
}

impl ModelRegistry {
    /// Build a registry, validating that the default model is in the catalog.
    pub fn new(
        entries: impl IntoIterator<Item = ModelEntry>,
        default_model: Model,
    ) -> Result<Self, DomainError> {
        let entries: Vec<ModelEntry> = entries.into_iter().collect();
        if entries.iter().any(|e| e.id.as_str().trim().is_empty()) {
            return Err(DomainError::InvalidRegistry(
                "model id cannot be empty".to_string(),
            ));
        }

        let registry = Self::from_trusted(entries, default_model);
        if !registry.entries.contains_key(registry.default_model.as_str()) {
            return Err(DomainError::InvalidRegistry(format!(
                "default model '{}' is not in the catalog",
                registry.default_model
            )));
        }
        Ok(registry)
    }

    /// Catalog used when no configuration overrides it.
    pub fn builtin() -> Self {
        let entries = [
            ModelEntry::new("deepseek/deepseek-chat")
                .with_online_variant("deepseek/deepseek-chat:online"),
            ModelEntry::new("openai/gpt-4o-mini").with_online_variant("openai/gpt-4o-mini:online"),
            ModelEntry::new("openai/gpt-4o").with_online_variant("openai/gpt-4o:online"),
            ModelEntry::new("anthropic/claude-3.5-haiku"),
            ModelEntry::new("meta-llama/llama-3.1-8b-instruct"),
            ModelEntry::new("qwen/qwen2.5-vl-7b-instruct").without_tools(),
        ];
        Self::from_trusted(entries, Model::default())
    }

    fn from_trusted(entries: impl IntoIterator<Item = ModelEntry>, default_model: Model) -> Self {
        let mut catalog = BTreeMap::new();
        let mut online_index = BTreeMap::new();
        for entry in entries {
            if let Some(variant) = &entry.online_variant {
                online_index.insert(variant.as_str().to_string(), entry.id.as_str().to_string());
            }
            catalog.insert(entry.id.as_str().to_string(), entry);
        }
        Self {
            entries: catalog,
            online_index,
            default_model,
        }
    }

    pub fn default_model(&self) -> &Model {
        &self.default_model
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.values()
    }

    /// Look up a catalog entry by base id or online variant id.
    pub fn get(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.get(id).or_else(|| {
            self.online_index
                .get(id)
                .and_then(|base| self.entries.get(base))
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve the model for a request.
    ///
    /// Requesting an online variant directly is accepted: the selection then
    /// has provider-side grounding regardless of `grounding_needed`.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        grounding_needed: bool,
    ) -> Result<ModelSelection, DomainError> {
        let requested = requested.map(str::trim).filter(|s| !s.is_empty());
        let id = requested.unwrap_or(self.default_model.as_str());

        if let Some(entry) = self.entries.get(id) {
            let selection = match (&entry.online_variant, grounding_needed) {
                (Some(online), true) => ModelSelection {
                    base_model: entry.id.clone(),
                    resolved_model: online.clone(),
                    grounding_enabled: true,
                    supports_tools: entry.supports_tools,
                },
                _ => ModelSelection {
                    base_model: entry.id.clone(),
                    resolved_model: entry.id.clone(),
                    grounding_enabled: false,
                    supports_tools: entry.supports_tools,
                },
            };
            return Ok(selection);
        }

        if let Some(entry) = self.online_index.get(id).and_then(|b| self.entries.get(b)) {
            return Ok(ModelSelection {
                base_model: entry.id.clone(),
                resolved_model: Model::new(id),
                grounding_enabled: true,
                supports_tools: entry.supports_tools,
            });
        }

        Err(DomainError::UnknownModel(id.to_string()))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
