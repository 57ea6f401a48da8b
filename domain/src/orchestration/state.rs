//! Orchestration loop state machine.
//!
//! Pure transitions, no I/O. The application layer performs the model and
//! tool calls and reports what happened as [`LoopEvent`]s.
//!
//! ```text
//!  Init ──Started──▶ AwaitingModel{0}
//!                        │
//!        ModelReplied(no calls)──────────────▶ Finalized(Answered)
//!        ModelReplied(calls), turns < cap ───▶ ToolDispatch{n+1}
//!        ModelReplied(calls), turns == cap ──▶ Finalized(IterationCapReached)
//!                        ▲
//!  ToolDispatch{n} ──ToolsCompleted──┘ (AwaitingModel{n})
//! ```
//!
//! With a cap of `N`, at most `N` tool rounds run and the model is called at
//! most `N + 1` times, so the loop always terminates.

use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;

/// Bounds on the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnLimits {
    pub max_tool_turns: usize,
}

impl TurnLimits {
    pub const DEFAULT_MAX_TOOL_TURNS: usize = 4;

    pub fn new(max_tool_turns: usize) -> Self {
        Self { max_tool_turns }
    }
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_TOOL_TURNS)
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeReason {
    /// The model answered without requesting tools
    Answered,
    /// The model kept requesting tools after the last allowed round
    IterationCapReached,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Init,
    /// Waiting for the model; `tool_turns` rounds completed so far
    AwaitingModel { tool_turns: usize },
    /// Executing the calls of round `turn` (1-based)
    ToolDispatch { turn: usize, calls: Vec<ToolCall> },
    Finalized { reason: FinalizeReason, tool_turns: usize },
}

#[derive(Debug, Clone)]
pub enum LoopEvent {
    Started,
    ModelReplied { tool_calls: Vec<ToolCall> },
    ToolsCompleted,
}

impl LoopState {
    /// Apply an event, returning the next state.
    pub fn on(self, event: LoopEvent, limits: &TurnLimits) -> Result<LoopState, DomainError> {
        match (self, event) {
            (LoopState::Init, LoopEvent::Started) => Ok(LoopState::AwaitingModel { tool_turns: 0 }),

            (LoopState::AwaitingModel { tool_turns }, LoopEvent::ModelReplied { tool_calls }) => {
                if tool_calls.is_empty() {
                    Ok(LoopState::Finalized {
                        reason: FinalizeReason::Answered,
                        tool_turns,
                    })
                } else if tool_turns >= limits.max_tool_turns {
                    Ok(LoopState::Finalized {
                        reason: FinalizeReason::IterationCapReached,
                        tool_turns,
                    })
                } else {
                    Ok(LoopState::ToolDispatch {
                        turn: tool_turns + 1,
                        calls: tool_calls,
                    })
                }
            }

            (LoopState::ToolDispatch { turn, .. }, LoopEvent::ToolsCompleted) => {
                Ok(LoopState::AwaitingModel { tool_turns: turn })
            }

            (state, event) => Err(DomainError::InvalidTransition(format!(
                "{} cannot handle {:?}",
                state.name(),
                event
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoopState::Init => "init",
            LoopState::AwaitingModel { .. } => "awaiting_model",
            LoopState::ToolDispatch { .. } => "tool_dispatch",
            LoopState::Finalized { .. } => "finalized",
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, LoopState::Finalized { .. })
    }
}
