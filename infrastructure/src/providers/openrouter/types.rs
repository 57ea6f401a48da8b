//! Wire format of the OpenAI-compatible chat-completions API.
//!
//! Requests are built from domain [`Message`]s; responses (plain JSON or
//! SSE chunks) are turned back into an [`LlmResponse`].

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tutor_application::ports::llm_gateway::{ChatRequest, GatewayError};
use tutor_domain::{ContentBlock, LlmResponse, Message, Role, StopReason, ToolCall};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tools: &'a [serde_json::Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl<'a> ChatCompletionBody<'a> {
    pub fn from_request(request: &ChatRequest<'a>) -> Self {
        Self {
            model: request.model.as_str(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            max_tokens: request.max_tokens,
            tools: request.tools,
            tool_choice: (!request.tools.is_empty()).then_some("auto"),
            stream: request.stream,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    role: Role,
    /// `null` for assistant turns that only carry tool calls
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = if message.role == Role::Assistant
            && !message.tool_calls.is_empty()
            && message.content.is_empty()
        {
            None
        } else {
            Some(message.content.as_str())
        };
        Self {
            role: message.role,
            content,
            tool_calls: message.tool_calls.iter().map(WireToolCall::from).collect(),
            tool_call_id: message.tool_call_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    /// JSON-encoded object, as the API expects
    arguments: String,
}

impl<'a> From<&'a ToolCall> for WireToolCall<'a> {
    fn from(call: &'a ToolCall) -> Self {
        // A HashMap of JSON values always serializes.
        let arguments = serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".into());
        Self {
            id: &call.call_id,
            kind: "function",
            function: WireFunction {
                name: &call.tool_name,
                arguments,
            },
        }
    }
}

/// Decode tool-call arguments.
///
/// Providers send a JSON-encoded string, some send the object itself. A
/// string that is not JSON is taken as the search query.
pub(crate) fn parse_arguments(raw: &serde_json::Value) -> HashMap<String, serde_json::Value> {
    match raw {
        serde_json::Value::Object(map) => map.clone().into_iter().collect(),
        serde_json::Value::String(s) if s.trim().is_empty() => HashMap::new(),
        serde_json::Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::from([("query".to_string(), serde_json::Value::String(s.clone()))]),
        },
        _ => HashMap::new(),
    }
}

/// Parse a non-streaming completion.
pub(crate) fn parse_completion(data: &serde_json::Value) -> Result<LlmResponse, GatewayError> {
    if let Some(error) = data.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown provider error");
        return Err(GatewayError::InvalidResponse(message.to_string()));
    }

    let choice = data["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;
    let message = &choice["message"];

    let mut content = Vec::new();
    if let Some(text) = message["content"].as_str()
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text.to_string()));
    }

    if let Some(calls) = message["tool_calls"].as_array() {
        for call in calls {
            let function = &call["function"];
            let Some(name) = function["name"].as_str() else {
                continue;
            };
            content.push(ContentBlock::ToolUse {
                id: call["id"].as_str().unwrap_or_default().to_string(),
                name: name.to_string(),
                input: parse_arguments(&function["arguments"]),
            });
        }
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice["finish_reason"].as_str().map(StopReason::from_finish_reason),
        model: data["model"].as_str().map(str::to_string),
    })
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates an SSE stream of completion chunks.
///
/// Feed it complete lines with [`push_line`](Self::push_line); text deltas
/// are concatenated and tool-call deltas are merged by their `index`.
#[derive(Debug, Default)]
pub(crate) struct SseAccumulator {
    text: String,
    tool_calls: BTreeMap<u64, PartialToolCall>,
    finish_reason: Option<String>,
    model: Option<String>,
    done: bool,
}

impl SseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), GatewayError> {
        let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") else {
            return Ok(());
        };
        let data = data.trim();
        if data.is_empty() {
            return Ok(());
        }
        if data == "[DONE]" {
            self.done = true;
            return Ok(());
        }

        let chunk: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| GatewayError::InvalidResponse(format!("Bad stream chunk: {}", e)))?;

        if let Some(error) = chunk.get("error") {
            let message = error["message"].as_str().unwrap_or("stream error");
            return Err(GatewayError::InvalidResponse(message.to_string()));
        }
        if self.model.is_none() {
            self.model = chunk["model"].as_str().map(str::to_string);
        }

        let Some(choice) = chunk["choices"].as_array().and_then(|c| c.first()) else {
            return Ok(());
        };
        if let Some(reason) = choice["finish_reason"].as_str() {
            self.finish_reason = Some(reason.to_string());
        }

        let delta = &choice["delta"];
        if let Some(text) = delta["content"].as_str() {
            self.text.push_str(text);
        }
        if let Some(calls) = delta["tool_calls"].as_array() {
            for call in calls {
                let index = call["index"].as_u64().unwrap_or(0);
                let entry = self.tool_calls.entry(index).or_default();
                if let Some(id) = call["id"].as_str() {
                    entry.id = id.to_string();
                }
                if let Some(name) = call["function"]["name"].as_str() {
                    entry.name.push_str(name);
                }
                if let Some(args) = call["function"]["arguments"].as_str() {
                    entry.arguments.push_str(args);
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> LlmResponse {
        let mut content = Vec::new();
        if !self.text.is_empty() {
            content.push(ContentBlock::Text(self.text));
        }
        for (_, call) in self.tool_calls {
            if call.name.is_empty() {
                continue;
            }
            content.push(ContentBlock::ToolUse {
                id: call.id,
                name: call.name,
                input: parse_arguments(&serde_json::Value::String(call.arguments)),
            });
        }
        LlmResponse {
            content,
            stop_reason: self.finish_reason.as_deref().map(StopReason::from_finish_reason),
            model: self.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_domain::Model;

    #[test]
    fn test_request_body_with_tool_turn() {
        let model = Model::new("anthropic/claude-3.5-haiku");
        let call = ToolCall::new("web_search")
            .with_call_id("call_0")
            .with_arg("query", "campeão 2025");
        let messages = vec![
            Message::system("És um tutor."),
            Message::user("Quem ganhou?"),
            Message::assistant_with_calls("", vec![call]),
            Message::tool("call_0", "resultado"),
        ];
        let tools = vec![serde_json::json!({"type": "function", "function": {"name": "web_search"}})];
        let request = ChatRequest {
            model: &model,
            messages: &messages,
            tools: &tools,
            max_tokens: 2000,
            stream: false,
        };

        let body = serde_json::to_value(ChatCompletionBody::from_request(&request)).unwrap();

        assert_eq!(body["model"], "anthropic/claude-3.5-haiku");
        assert_eq!(body["tool_choice"], "auto");
        assert!(body.get("stream").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        let assistant = &body["messages"][2];
        assert!(assistant["content"].is_null());
        assert_eq!(assistant["tool_calls"][0]["type"], "function");
        let args: serde_json::Value =
            serde_json::from_str(assistant["tool_calls"][0]["function"]["arguments"].as_str().unwrap())
                .unwrap();
        assert_eq!(args["query"], "campeão 2025");
        assert_eq!(body["messages"][3]["tool_call_id"], "call_0");
    }

    #[test]
    fn test_request_body_without_tools() {
        let model = Model::default();
        let messages = vec![Message::user("Olá")];
        let request = ChatRequest {
            model: &model,
            messages: &messages,
            tools: &[],
            max_tokens: 1200,
            stream: true,
        };

        let body = serde_json::to_value(ChatCompletionBody::from_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn test_parse_text_completion() {
        let data = serde_json::json!({
            "model": "deepseek/deepseek-chat",
            "choices": [{
                "message": {"role": "assistant", "content": "2 + 2 = 4"},
                "finish_reason": "stop"
            }]
        });

        let response = parse_completion(&data).unwrap();
        assert_eq!(response.text_content(), "2 + 2 = 4");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.model.as_deref(), Some("deepseek/deepseek-chat"));
    }

    #[test]
    fn test_parse_tool_call_completion() {
        let data = serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "a", "type": "function",
                         "function": {"name": "web_search", "arguments": "{\"query\":\"eleições\"}"}},
                        {"id": "b", "type": "function",
                         "function": {"name": "wikipedia", "arguments": {"query": "Camões"}}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let calls = parse_completion(&data).unwrap().tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_string("query"), Some("eleições"));
        assert_eq!(calls[1].tool_name, "wikipedia");
        assert_eq!(calls[1].get_string("query"), Some("Camões"));
    }

    #[test]
    fn test_parse_without_choices_is_invalid() {
        let result = parse_completion(&serde_json::json!({"choices": []}));
        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_arguments_variants() {
        let raw = serde_json::Value::String("preço do petróleo".into());
        assert_eq!(
            parse_arguments(&raw)["query"],
            serde_json::json!("preço do petróleo")
        );
        assert!(parse_arguments(&serde_json::Value::String(String::new())).is_empty());
        assert!(parse_arguments(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_sse_accumulates_text_and_tool_calls() {
        let lines = [
            r#"data: {"model":"openai/gpt-4o-mini","choices":[{"delta":{"content":"A "}}]}"#,
            ": keep-alive",
            r#"data: {"choices":[{"delta":{"content":"resposta"}}]}"#,
            r#"data: {"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","function":{"name":"web_search","arguments":"{\"qu"}}]}}]}"#,
            r#"data: {"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"ery\":\"x\"}"}}]},"finish_reason":"tool_calls"}]}"#,
            "",
            "data: [DONE]",
        ];

        let mut acc = SseAccumulator::new();
        for line in lines {
            acc.push_line(line).unwrap();
        }
        assert!(acc.is_done());

        let response = acc.finish();
        assert_eq!(response.text_content(), "A resposta");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.model.as_deref(), Some("openai/gpt-4o-mini"));
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, "c1");
        assert_eq!(calls[0].get_string("query"), Some("x"));
    }

    #[test]
    fn test_sse_error_chunk() {
        let mut acc = SseAccumulator::new();
        let result = acc.push_line(r#"data: {"error":{"message":"overloaded"}}"#);
        assert!(matches!(result, Err(GatewayError::InvalidResponse(m)) if m == "overloaded"));
    }
}
