//! Tool domain value objects: immutable result and error types
//!
//! Every tool execution produces a [`ToolResult`]. Failures are values, not
//! errors: the orchestration loop feeds them back into the transcript and
//! keeps going.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Meaning |
/// |------|---------|
/// | `NOT_FOUND` | Unsupported tool name |
/// | `INVALID_ARGUMENT` | Missing or malformed arguments |
/// | `EXECUTION_FAILED` | Provider error (HTTP status, bad payload) |
/// | `TIMEOUT` | The call exceeded the tool timeout |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const TIMEOUT: &'static str = "TIMEOUT";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unsupported_tool(name: impl Into<String>) -> Self {
        Self::new(
            Self::NOT_FOUND,
            format!("Unsupported tool: {}", name.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn is_timeout(&self) -> bool {
        self.code == Self::TIMEOUT
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of one tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers
    #[serde(default)]
    pub call_id: String,
    /// Canonical name of the tool that ran (or the raw name if unsupported)
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Whether the output was cut to the summary limit
    #[serde(default)]
    pub truncated: bool,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            call_id: String::new(),
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn for_call(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = call_id.into();
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Cap the output at `max_chars` characters
    pub fn truncated_to(mut self, max_chars: usize) -> Self {
        if let Some(output) = &self.output
            && output.chars().count() > max_chars
        {
            let cut = crate::util::truncate_chars(output, max_chars).to_string();
            self.output = Some(format!("{}…", cut));
            self.metadata.truncated = true;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text fed back to the model for this result.
    ///
    /// Failed calls become an explicit marker so the model knows the tool
    /// ran but produced nothing usable.
    pub fn transcript_content(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.success => output.clone(),
            (_, Some(error)) => format!("Tool '{}' failed: {}", self.tool_name, error),
            _ => format!("Tool '{}' returned no content", self.tool_name),
        }
    }
}
