//! Run Orchestration use case.
//!
//! Drives one question through the [`LoopState`] machine:
//!
//! 1. Decide grounding with the configured [`GroundingPolicy`]
//! 2. Resolve the model through the [`ModelRegistry`] (online variant when
//!    grounding is required and the model has one)
//! 3. Alternate model calls and tool rounds until the model answers without
//!    requesting tools, or the tool-turn cap is reached
//!
//! Tool failures never abort the loop: they are fed back to the model as
//! failed results. Only gateway errors (after retries) and unknown models
//! surface as [`OrchestrationError`].

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::shared::complete_with_retry;
use crate::use_cases::tool_helpers::{assign_call_ids, tool_args_preview};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tutor_domain::util::truncate_chars;
use tutor_domain::{
    DEGRADED_ANSWER, DomainError, FinalizeReason, GroundingDecision, GroundingPolicy, LiveSearch,
    LoopEvent, LoopState, ModelRegistry, ModelSelection, Platform, Question, ToolCall, ToolError,
    ToolResult, Transcript, TutorPromptTemplate,
};

/// Errors that end an orchestration run.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for OrchestrationError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownModel(id) => OrchestrationError::UnknownModel(id),
            other => OrchestrationError::Internal(other.to_string()),
        }
    }
}

/// Input for the [`RunOrchestrationUseCase`].
#[derive(Debug, Clone)]
pub struct RunOrchestrationInput {
    pub question: Question,
    pub platform: Platform,
    /// Model requested by the caller; `None` means the registry default.
    pub requested_model: Option<String>,
    /// Resolved school context for the system prompt.
    pub school_context: Option<String>,
    pub streaming: bool,
    pub execution: ExecutionParams,
}

impl RunOrchestrationInput {
    pub fn new(question: Question, execution: ExecutionParams) -> Self {
        Self {
            question,
            platform: Platform::default(),
            requested_model: None,
            school_context: None,
            streaming: false,
            execution,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.requested_model = model;
        self
    }

    pub fn with_school_context(mut self, context: Option<String>) -> Self {
        self.school_context = context;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }
}

/// Result of an orchestration run, before answer shaping.
#[derive(Debug, Clone)]
pub struct RunOrchestrationOutput {
    /// Raw final answer (or the degraded fallback).
    pub answer: String,
    pub selection: ModelSelection,
    pub grounding: GroundingDecision,
    /// Canonical names of dispatched tools, in invocation order.
    pub tools_used: Vec<String>,
    /// Outputs of successful tool calls, in invocation order.
    pub tool_outputs: Vec<String>,
    pub tool_turns: usize,
    pub finalize_reason: FinalizeReason,
    /// False when live data was needed but nothing confirmed it.
    pub live_data_verified: bool,
    /// The answer is a fallback rather than a normal model answer.
    pub degraded: bool,
}

/// Use case running the model/tool loop for one question.
pub struct RunOrchestrationUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    registry: Arc<ModelRegistry>,
    grounding: Arc<dyn GroundingPolicy>,
}

impl Clone for RunOrchestrationUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            registry: self.registry.clone(),
            grounding: self.grounding.clone(),
        }
    }
}

impl RunOrchestrationUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
        registry: Arc<ModelRegistry>,
        grounding: Arc<dyn GroundingPolicy>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            registry,
            grounding,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub async fn execute(
        &self,
        input: RunOrchestrationInput,
    ) -> Result<RunOrchestrationOutput, OrchestrationError> {
        let question = input.question.content();
        let grounding = self.grounding.decide(question);
        let selection = self
            .registry
            .resolve(input.requested_model.as_deref(), grounding.is_required())?;

        let spec = self.tool_executor.tool_spec();
        let tools_offered = selection.offers_tools(grounding.allows_tools()) && !spec.is_empty();
        let tools = if tools_offered {
            self.tool_schema.all_tools_schema(spec)
        } else {
            Vec::new()
        };
        let live = if selection.grounding_enabled {
            LiveSearch::Provider
        } else if tools_offered {
            LiveSearch::Tools
        } else {
            LiveSearch::Off
        };

        info!(
            "Orchestrating with {} (policy {}: {:?}, tools: {}): {}",
            selection.resolved_model,
            self.grounding.name(),
            grounding,
            tools.len(),
            truncate_chars(question, 100)
        );

        let system = TutorPromptTemplate::system(
            &input.platform,
            input.school_context.as_deref(),
            live,
        );
        let mut transcript = Transcript::new(system, question);
        let limits = input.execution.turn_limits();
        let max_tokens = input.execution.max_tokens_for(&input.platform);

        let mut tools_used = Vec::new();
        let mut tool_outputs = Vec::new();
        let mut final_text = String::new();
        let mut last_text: Option<String> = None;

        let mut state = LoopState::Init.on(LoopEvent::Started, &limits)?;
        let (reason, tool_turns) = loop {
            state = match state {
                LoopState::AwaitingModel { tool_turns } => {
                    let request = ChatRequest {
                        model: &selection.resolved_model,
                        messages: transcript.messages(),
                        tools: &tools,
                        max_tokens,
                        stream: input.streaming,
                    };
                    let response = complete_with_retry(
                        self.gateway.as_ref(),
                        request,
                        input.execution.model_retries,
                        input.execution.retry_backoff,
                    )
                    .await?;

                    let text = response.text_content();
                    if !text.trim().is_empty() {
                        last_text = Some(text.clone());
                    }
                    let calls = assign_call_ids(response.tool_calls(), tool_turns + 1);
                    debug!(
                        "Model turn after {} tool rounds: {} chars, {} tool calls",
                        tool_turns,
                        text.len(),
                        calls.len()
                    );

                    let next = LoopState::AwaitingModel { tool_turns }.on(
                        LoopEvent::ModelReplied {
                            tool_calls: calls.clone(),
                        },
                        &limits,
                    )?;
                    if let LoopState::ToolDispatch { .. } = next {
                        transcript.push_tool_request(text, calls);
                    } else {
                        final_text = text;
                    }
                    next
                }

                LoopState::ToolDispatch { turn, calls } => {
                    debug!(
                        "Tool round {}/{}: {} calls",
                        turn,
                        limits.max_tool_turns,
                        calls.len()
                    );
                    let results = self.dispatch_tools(&calls).await;

                    for (call, result) in calls.iter().zip(&results) {
                        let name = spec
                            .resolve(&call.tool_name)
                            .unwrap_or(call.tool_name.as_str());
                        tools_used.push(name.to_string());
                        match result.output() {
                            Some(output) if result.is_success() => {
                                tool_outputs.push(output.to_string());
                            }
                            _ => warn!(
                                "Tool {} ({}) failed: {}",
                                call.tool_name,
                                tool_args_preview(call),
                                result
                                    .error()
                                    .map(|e| e.to_string())
                                    .unwrap_or_else(|| "no output".to_string())
                            ),
                        }
                    }
                    transcript.push_tool_results(&results);

                    LoopState::ToolDispatch { turn, calls }.on(LoopEvent::ToolsCompleted, &limits)?
                }

                LoopState::Finalized { reason, tool_turns } => break (reason, tool_turns),

                other => other.on(LoopEvent::Started, &limits)?,
            };
        };

        let (answer, degraded) = match reason {
            FinalizeReason::Answered if !final_text.trim().is_empty() => (final_text, false),
            FinalizeReason::Answered => {
                warn!("Model returned an empty answer; using fallback");
                (DEGRADED_ANSWER.to_string(), true)
            }
            FinalizeReason::IterationCapReached => {
                warn!(
                    "Tool-turn cap ({}) reached; finalizing with last model text",
                    limits.max_tool_turns
                );
                (
                    last_text.unwrap_or_else(|| DEGRADED_ANSWER.to_string()),
                    true,
                )
            }
        };

        let grounding_attempted = grounding.is_required() || !tools_used.is_empty();
        let live_data_verified =
            selection.grounding_enabled || !grounding_attempted || !tool_outputs.is_empty();

        info!(
            "Orchestration finished: {:?} after {} tool rounds, tools {:?}",
            reason, tool_turns, tools_used
        );

        Ok(RunOrchestrationOutput {
            answer,
            selection,
            grounding,
            tools_used,
            tool_outputs,
            tool_turns,
            finalize_reason: reason,
            live_data_verified,
            degraded,
        })
    }

    /// Execute all calls of one round concurrently.
    ///
    /// Each future is tagged with its index; results are slotted back so the
    /// returned vector follows emission order regardless of completion order.
    async fn dispatch_tools(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let executor = self.tool_executor.as_ref();
        let mut pending: FuturesUnordered<_> = calls
            .iter()
            .enumerate()
            .map(|(index, call)| async move { (index, executor.execute(call).await) })
            .collect();

        let mut slots: Vec<Option<ToolResult>> = (0..calls.len()).map(|_| None).collect();
        while let Some((index, result)) = pending.next().await {
            slots[index] = Some(result);
        }

        calls
            .iter()
            .zip(slots)
            .map(|(call, slot)| {
                slot.unwrap_or_else(|| {
                    ToolResult::failure(
                        &call.tool_name,
                        ToolError::execution_failed("tool call produced no result"),
                    )
                })
                .for_call(&call.call_id)
            })
            .collect()
    }
}
