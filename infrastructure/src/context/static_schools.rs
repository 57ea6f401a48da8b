//! School context from configuration
//!
//! Schools are declared in the config file and looked up by id:
//!
//! ```toml
//! [schools.esc-braga]
//! name = "Escola Básica de Braga"
//! context = "Turmas do 5.º ao 9.º ano."
//! ```

use crate::config::FileSchoolConfig;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use tutor_application::{SchoolContextError, SchoolContextPort};

/// In-memory school table built once at startup.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use tutor_infrastructure::StaticSchoolContext;
///
/// let schools = StaticSchoolContext::from_config(&BTreeMap::new());
/// assert!(schools.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSchoolContext {
    contexts: HashMap<String, String>,
}

impl StaticSchoolContext {
    /// Schools whose entry yields no prompt text are skipped.
    pub fn from_config(schools: &BTreeMap<String, FileSchoolConfig>) -> Self {
        let contexts = schools
            .iter()
            .filter_map(|(id, school)| Some((id.trim().to_string(), school.prompt_context()?)))
            .collect();
        Self { contexts }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[async_trait]
impl SchoolContextPort for StaticSchoolContext {
    async fn lookup(&self, school_id: &str) -> Result<Option<String>, SchoolContextError> {
        let context = self.contexts.get(school_id.trim()).cloned();
        if context.is_none() {
            debug!(school_id, "No context configured for school");
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schools() -> BTreeMap<String, FileSchoolConfig> {
        BTreeMap::from([
            (
                "esc-braga".to_string(),
                FileSchoolConfig {
                    name: "Escola Básica de Braga".to_string(),
                    context: "5.º ao 9.º ano".to_string(),
                },
            ),
            ("vazia".to_string(), FileSchoolConfig::default()),
        ])
    }

    #[tokio::test]
    async fn test_lookup_known_school() {
        let context = StaticSchoolContext::from_config(&schools());
        assert_eq!(context.len(), 1);

        let found = context.lookup(" esc-braga ").await.unwrap();
        assert_eq!(
            found.as_deref(),
            Some("Escola: Escola Básica de Braga\n5.º ao 9.º ano")
        );
    }

    #[tokio::test]
    async fn test_lookup_unknown_or_empty_school() {
        let context = StaticSchoolContext::from_config(&schools());
        assert_eq!(context.lookup("outra").await.unwrap(), None);
        assert_eq!(context.lookup("vazia").await.unwrap(), None);
    }
}
