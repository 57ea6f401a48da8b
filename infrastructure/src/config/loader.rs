//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "tutor.toml";

/// Prefix for environment overrides (`TUTOR_SERVER__PORT=9000`)
pub const ENV_PREFIX: &str = "TUTOR_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables `TUTOR_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./tutor.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/school-tutor/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Some(Path::new(PROJECT_CONFIG_FILE)),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Build the merged figment from explicit file locations.
    ///
    /// Missing optional files are skipped; the explicit file must exist.
    pub fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns $XDG_CONFIG_HOME/school-tutor/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("school-tutor").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn config_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut sources = Vec::new();

        if let Some(path) = explicit {
            sources.push(format!("[FOUND] Explicit: {}", path.display()));
        }

        match Self::project_config_path() {
            Some(path) => sources.push(format!("[FOUND] Project: {}", path.display())),
            None => sources.push(format!("[     ] Project: ./{}", PROJECT_CONFIG_FILE)),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            sources.push(format!("[{}] Global:  {}", mark, path.display()));
        }

        sources.push(format!("[     ] Env:     {}*", ENV_PREFIX));
        sources.push("[     ] Default: built-in defaults".to_string());
        sources
    }
}
