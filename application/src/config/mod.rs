//! Application-level configuration.
//!
//! - [`ExecutionParams`]: loop and request control (tool turns, timeouts,
//!   retries, token budgets)

pub mod execution_params;

pub use execution_params::ExecutionParams;
