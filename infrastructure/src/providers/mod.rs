//! LLM provider adapters
//!
//! Each provider implements [`LlmGateway`](tutor_application::LlmGateway).

pub mod openrouter;

pub use openrouter::OpenRouterGateway;
