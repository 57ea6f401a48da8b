//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] : a language model identifier
//! - [`question::Question`] : a sanitized, validated question
//! - [`error::DomainError`] : domain-level errors

pub mod error;
pub mod model;
pub mod question;
