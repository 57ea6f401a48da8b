//! HTTP server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// HTTP listener settings
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl FileServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
