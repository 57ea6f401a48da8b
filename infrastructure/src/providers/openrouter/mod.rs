//! OpenRouter provider
//!
//! Chat completions over OpenRouter's OpenAI-compatible API. Any endpoint
//! speaking the same protocol works by changing `provider.base_url`.
//!
//! Online model variants (`…:online`) are plain model ids here; the
//! provider performs the live retrieval.

mod gateway;
mod types;

pub use gateway::OpenRouterGateway;
