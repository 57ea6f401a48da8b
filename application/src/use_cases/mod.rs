//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch_query;
pub mod run_orchestration;
pub(crate) mod shared;
pub(crate) mod tool_helpers;
