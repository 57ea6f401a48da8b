//! School context lookup port.
//!
//! Turns a `schoolId` into human-readable context for the system prompt.
//! The school data model itself is owned by the host application.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchoolContextError {
    #[error("School context unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SchoolContextPort: Send + Sync {
    /// Context for `school_id`, or `None` when the school is unknown.
    async fn lookup(&self, school_id: &str) -> Result<Option<String>, SchoolContextError>;
}

/// Lookup that never has context
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchoolContext;

#[async_trait]
impl SchoolContextPort for NoSchoolContext {
    async fn lookup(&self, _school_id: &str) -> Result<Option<String>, SchoolContextError> {
        Ok(None)
    }
}
