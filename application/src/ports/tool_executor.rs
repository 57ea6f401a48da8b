//! Tool Executor port
//!
//! Defines the interface for executing tool calls requested by the model.

use async_trait::async_trait;
use tutor_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` never fails: unsupported tools, bad arguments, provider errors
/// and timeouts all come back as a failed [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Tools offered to the model, with aliases
    fn tool_spec(&self) -> &ToolSpec;

    /// Execute one call. The executor enforces its own timeout.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
