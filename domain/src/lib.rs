//! Domain layer for school-tutor
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Query
//!
//! A student or teacher asks a question over some channel (web, WhatsApp,
//! Discord). The question is answered by a language model, optionally
//! **grounded** with live web information.
//!
//! ## Grounding
//!
//! Grounding happens in one of two ways:
//!
//! - **Online variant**: the model registry substitutes a model id whose
//!   provider performs live retrieval itself (e.g. `deepseek/deepseek-chat:online`)
//! - **Tool calling**: the model requests `web_search` / `wikipedia_search`
//!   and the orchestration loop feeds the results back into the transcript

pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod query;
pub mod registry;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model, question::Question};
pub use orchestration::{
    grounding::{
        GroundingDecision, GroundingPolicy, GroundingPolicyKind, KeywordGroundingPolicy,
        ModelDecidesPolicy,
    },
    state::{FinalizeReason, LoopEvent, LoopState, TurnLimits},
};
pub use prompt::{DEGRADED_ANSWER, LiveSearch, TutorPromptTemplate, UNVERIFIED_NOTE};
pub use query::{
    format::{normalize_answer, redact_urls, web_context_excerpt},
    request::{AccessKey, CallerId, Platform, QueryRequest},
    response::QueryResponse,
};
pub use registry::{ModelEntry, ModelRegistry, ModelSelection};
pub use session::{
    entities::{Message, Role, Transcript},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
