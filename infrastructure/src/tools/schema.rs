//! OpenAI function-calling tool converter.
//!
//! Implementation of [`ToolSchemaPort`] producing the `tools` array accepted
//! by OpenAI-compatible chat-completions APIs (OpenRouter included).

use tutor_application::ports::tool_schema::ToolSchemaPort;
use tutor_domain::tool::entities::ToolDefinition;

/// Produces `{"type": "function", "function": {...}}` declarations.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"number"`, `"integer"`, `"boolean"` pass through
/// - anything else → `"string"`
pub struct OpenAiSchemaToolConverter;

impl ToolSchemaPort for OpenAiSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}
