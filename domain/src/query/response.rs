//! Outbound query response

use serde::Serialize;

/// Answer to one query, plus bookkeeping about how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    /// Model id actually sent to the provider
    pub model_used: String,
    /// Model the caller asked for, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_requested: Option<String>,
    /// Tools dispatched, in invocation order. Duplicates allowed.
    pub tools_used: Vec<String>,
    pub processing_time_ms: u64,
    /// Whether the provider performed live retrieval itself
    pub grounding_enabled: bool,
    /// Excerpt of successful tool output, URLs redacted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_context: Option<String>,
    /// False when live data was needed but no source could confirm it
    pub live_data_verified: bool,
    /// Number of ToolDispatch rounds
    pub tool_turns: usize,
    /// The answer is a fallback (iteration cap or empty model output)
    pub degraded: bool,
}
