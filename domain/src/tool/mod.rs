//! Tool domain module
//!
//! How the model reaches outside the conversation for live information.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (catalog)    │    │ (invocation) │    │ (output)     │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "duckduckgo_search" → "web_search"
//!        └─ tools:   "web_search" → ToolDefinition
//! ```
//!
//! The domain only describes tools. Execution (HTTP, timeouts, concurrency
//! caps) is behind the application layer's `ToolExecutorPort`.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
