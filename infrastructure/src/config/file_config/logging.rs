//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [logging]
/// dir = "/var/log/school-tutor"   # daily rolling file, in addition to stderr
/// file_prefix = "school-tutor.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "school-tutor.log".to_string(),
        }
    }
}
