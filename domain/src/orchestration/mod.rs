//! Orchestration domain
//!
//! The pure half of the orchestration loop: when to ground a question and
//! which state the tool-calling loop is in. The async driver lives in the
//! application layer.

pub mod grounding;
pub mod state;
