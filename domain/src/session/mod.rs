//! Conversation with the model for one request.
//!
//! - [`entities::Transcript`]: ordered messages, including tool rounds
//! - [`response::LlmResponse`]: one model turn (text and/or tool calls)

pub mod entities;
pub mod response;
