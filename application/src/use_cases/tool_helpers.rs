//! Shared helpers for tool dispatch.

use tutor_domain::ToolCall;

/// Short preview of a call's arguments for log lines.
///
/// Prefers `query`, then `term`, then the first string value.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    for key in ["query", "term"] {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(key) {
            return truncate_preview(s, 50);
        }
    }
    call.arguments
        .values()
        .find_map(|v| v.as_str())
        .map(|s| truncate_preview(s, 50))
        .unwrap_or_default()
}

/// Give every call a non-empty id so results can be matched in the transcript.
pub(crate) fn assign_call_ids(calls: Vec<ToolCall>, turn: usize) -> Vec<ToolCall> {
    calls
        .into_iter()
        .enumerate()
        .map(|(i, call)| {
            if call.call_id.trim().is_empty() {
                call.with_call_id(format!("call_{}_{}", turn, i))
            } else {
                call
            }
        })
        .collect()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
