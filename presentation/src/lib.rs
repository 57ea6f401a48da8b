//! Presentation layer for school-tutor
//!
//! This crate contains the CLI definitions and the HTTP API: wire DTOs,
//! error-to-status mapping and the axum router.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use http::{ApiError, AppState, QueryRequestDto, QueryResponseDto, router};
