//! Infrastructure layer for school-tutor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod context;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileModelsConfig, FileProviderConfig,
    FileSchoolConfig, FileToolsConfig,
};
pub use context::StaticSchoolContext;
pub use providers::OpenRouterGateway;
pub use tools::{
    LocalToolExecutor, NewsSearchTool, OpenAiSchemaToolConverter, ToolHandler, ToolSettings,
    WebSearchTool, WikipediaTool,
};
