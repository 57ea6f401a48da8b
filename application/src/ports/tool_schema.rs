//! Tool schema conversion port.
//!
//! The domain decides which tools exist; this port turns them into the JSON
//! declarations the provider API expects.

use tutor_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to provider tool declarations.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools, sorted by name.
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.all()
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
