//! Tool implementations for the orchestration loop
//!
//! Each tool is a [`ToolHandler`]: a definition the model sees plus an async
//! call. [`LocalToolExecutor`] owns the handlers and applies resolution,
//! validation, the per-call timeout, concurrency caps and truncation.
//!
//! ## Tools
//!
//! | Tool | Backend |
//! |------|---------|
//! | `web_search` | DuckDuckGo Instant Answer API |
//! | `news_search` | DuckDuckGo, query prefixed with `latest news` |
//! | `wikipedia_search` | Wikipedia REST summary, opensearch fallback |

pub mod web;

mod executor;
mod schema;

pub use executor::{LocalToolExecutor, ToolSettings};
pub use schema::OpenAiSchemaToolConverter;
pub use web::{
    NEWS_SEARCH, NewsSearchTool, WEB_SEARCH, WIKIPEDIA_SEARCH, WebSearchTool, WikipediaTool,
};

use async_trait::async_trait;
use tutor_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    value_objects::ToolError,
};

/// One callable tool.
///
/// Handlers receive calls that already passed validation against
/// [`definition`](Self::definition). Timeouts and truncation are applied by
/// the executor.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, call: &ToolCall) -> Result<String, ToolError>;
}

/// Names models commonly invent for the search tools.
///
/// `news_search` falls back to `web_search` when the news tool is disabled;
/// a registered tool always wins over an alias.
pub fn default_aliases() -> Vec<(&'static str, &'static str)> {
    vec![
        ("duckduckgo_search", WEB_SEARCH),
        ("search", WEB_SEARCH),
        ("web", WEB_SEARCH),
        ("news_search", WEB_SEARCH),
        ("current_events", WEB_SEARCH),
        ("wikipedia", WIKIPEDIA_SEARCH),
    ]
}
