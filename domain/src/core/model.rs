//! Model value object representing an LLM model identifier

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a language model as understood by the provider (Value Object)
///
/// Identifiers follow the OpenRouter `vendor/name[:variant]` convention, e.g.
/// `deepseek/deepseek-chat` or `deepseek/deepseek-chat:online`. Whether an
/// identifier is *known* is decided by the [`ModelRegistry`](crate::registry::ModelRegistry),
/// not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Model(String);

impl Model {
    /// Model used when neither the caller nor the configuration names one.
    pub const DEFAULT_ID: &'static str = "deepseek/deepseek-chat";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::new(Self::DEFAULT_ID)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::new(s.trim()))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::new(s))
    }
}
