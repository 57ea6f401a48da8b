//! Tool domain traits
//!
//! Pure validation logic. The async executor port lives in the application
//! layer.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Checks required parameters are present.
///
/// Extra arguments are tolerated: models often add fields like `limit` or
/// `language` that a tool can safely ignore.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in definition.required_parameters() {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(value) if param.param_type == "string" && !value.is_string() => {
                    return Err(format!(
                        "Parameter '{}' for tool '{}' must be a string",
                        param.name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
