//! School context table from TOML (`[schools]` section)

use serde::{Deserialize, Serialize};

/// One school, keyed by its `schoolId`.
///
/// ```toml
/// [schools.esc-braga]
/// name = "Escola Básica de Braga"
/// context = "Turmas do 5.º ao 9.º ano. Programa de Matemática com foco em problemas."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchoolConfig {
    pub name: String,
    pub context: String,
}

impl FileSchoolConfig {
    /// Text injected into the system prompt.
    pub fn prompt_context(&self) -> Option<String> {
        let name = self.name.trim();
        let context = self.context.trim();
        match (name.is_empty(), context.is_empty()) {
            (true, true) => None,
            (false, true) => Some(format!("Escola: {}", name)),
            (true, false) => Some(context.to_string()),
            (false, false) => Some(format!("Escola: {}\n{}", name, context)),
        }
    }
}
