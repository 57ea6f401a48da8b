//! Grounding policy configuration from TOML (`[grounding]` section)

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tutor_domain::{GroundingPolicy, GroundingPolicyKind};

/// ```toml
/// [grounding]
/// policy = "keywords"   # or "model"
/// reference_year = 2025 # years >= this count as "recent"; defaults to last year
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroundingConfig {
    pub policy: GroundingPolicyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<u16>,
}

impl FileGroundingConfig {
    /// Configured year, or the year before the current one.
    pub fn effective_reference_year(&self) -> u16 {
        self.reference_year.unwrap_or_else(|| {
            (chrono::Utc::now().year() - 1).clamp(0, u16::MAX as i32) as u16
        })
    }

    pub fn build_policy(&self) -> Box<dyn GroundingPolicy> {
        self.policy.build(self.effective_reference_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_keywords() {
        let config = FileGroundingConfig::default();
        assert_eq!(config.policy, GroundingPolicyKind::Keywords);
        assert!(config.effective_reference_year() >= 2024);
        assert_eq!(config.build_policy().name(), "keywords");
    }

    #[test]
    fn test_last_year_counts_as_recent_by_default() {
        let config = FileGroundingConfig::default();
        let last_year = chrono::Utc::now().year() - 1;
        assert_eq!(config.effective_reference_year() as i32, last_year);

        let policy = config.build_policy();
        let question = format!("Quem foram os vencedores em {}?", last_year);
        assert!(policy.decide(&question).is_required());
    }

    #[test]
    fn test_model_policy_from_toml() {
        let config: FileGroundingConfig =
            toml::from_str("policy = \"model\"\nreference_year = 2030").unwrap();
        assert_eq!(config.effective_reference_year(), 2030);
        assert_eq!(config.build_policy().name(), "model");
    }
}
