//! Configuration file loading for school-tutor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TUTOR_`-prefixed environment variables (`TUTOR_TOOLS__TIMEOUT_SECONDS=5`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./tutor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/school-tutor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileExecutionConfig, FileGroundingConfig,
    FileLoggingConfig, FileModelEntry, FileModelsConfig, FileNewsConfig, FileProviderConfig,
    FileSchoolConfig, FileServerConfig, FileToolsConfig, FileWebSearchConfig, FileWikipediaConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
