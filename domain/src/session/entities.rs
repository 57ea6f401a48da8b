//! Transcript entities

use crate::tool::{entities::ToolCall, value_objects::ToolResult};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in a transcript (Entity)
///
/// Assistant messages may carry the tool calls the model emitted; tool
/// messages carry the id of the call they answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_with_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }
}

/// Ordered conversation history for one request.
///
/// Lives only for the duration of the orchestration loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(question)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record the assistant turn that requested `calls`.
    pub fn push_tool_request(&mut self, text: impl Into<String>, calls: Vec<ToolCall>) {
        self.messages.push(Message::assistant_with_calls(text, calls));
    }

    /// Append results in the given order.
    pub fn push_tool_results(&mut self, results: &[ToolResult]) {
        for result in results {
            self.messages
                .push(Message::tool(&result.call_id, result.transcript_content()));
        }
    }

    /// Number of tool result messages recorded so far
    pub fn tool_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::Tool).count()
    }
}
