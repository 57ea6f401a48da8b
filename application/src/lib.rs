//! Application layer for the school tutor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    llm_gateway::{ChatRequest, GatewayError, LlmGateway},
    school_context::{NoSchoolContext, SchoolContextError, SchoolContextPort},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::dispatch_query::{DispatchQueryUseCase, QueryError, QueryInput};
pub use use_cases::run_orchestration::{
    OrchestrationError, RunOrchestrationInput, RunOrchestrationOutput, RunOrchestrationUseCase,
};
