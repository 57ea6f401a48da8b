//! Structured model responses.
//!
//! A model turn is a list of content blocks mixing text and tool-use
//! requests:
//!
//! ```text
//! complete() → LlmResponse ─┬─ text_content()  → final answer candidate
//!                           └─ tool_calls()    → ToolDispatch
//! ```

use crate::tool::entities::ToolCall;
use std::collections::HashMap;

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use tutor_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Vou pesquisar isso.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_abc123".to_string(),
///     name: "web_search".to_string(),
///     input: [("query".to_string(), serde_json::json!("presidente EUA 2025"))]
///         .into_iter().collect(),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Text produced by the model.
    Text(String),

    /// A tool use request from the model.
    ToolUse {
        /// Provider-assigned id correlating the request with its result.
        id: String,
        /// Tool name as emitted (may be an alias or unknown).
        name: String,
        /// Parsed arguments.
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &str, &HashMap<String, serde_json::Value>)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    /// The model wants tools executed before it continues.
    ToolUse,
    /// Hit the token limit; the text may be cut short.
    MaxTokens,
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" => StopReason::EndTurn,
            "tool_calls" | "function_call" | "tool_use" => StopReason::ToolUse,
            "length" | "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from a model turn.
///
/// # Examples
///
/// ```
/// use tutor_domain::session::response::{LlmResponse, ContentBlock, StopReason};
///
/// let response = LlmResponse::from_text("2 + 2 = 4");
/// assert_eq!(response.text_content(), "2 + 2 = 4");
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse {
///     content: vec![ContentBlock::ToolUse {
///         id: "call_1".to_string(),
///         name: "web_search".to_string(),
///         input: [("query".to_string(), serde_json::json!("tempo Lisboa hoje"))]
///             .into_iter().collect(),
///     }],
///     stop_reason: Some(StopReason::ToolUse),
///     model: Some("anthropic/claude-3.5-haiku".to_string()),
/// };
/// assert_eq!(response.tool_calls().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    /// Model identifier echoed by the provider, if any.
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract tool-use blocks, in emission order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::from_native(id, name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
