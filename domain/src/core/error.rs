//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Invalid model registry: {0}")]
    InvalidRegistry(String),

    #[error("Invalid loop transition: {0}")]
    InvalidTransition(String),
}

impl DomainError {
    /// Check if this error was caused by caller input (as opposed to
    /// configuration or an internal bug)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuestion(_)
                | DomainError::InvalidRequest(_)
                | DomainError::UnknownModel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_display() {
        let error = DomainError::UnknownModel("acme/gpt-9".to_string());
        assert_eq!(error.to_string(), "Unknown model: acme/gpt-9");
    }

    #[test]
    fn test_is_client_error() {
        assert!(DomainError::InvalidQuestion("empty".into()).is_client_error());
        assert!(DomainError::UnknownModel("x".into()).is_client_error());
        assert!(!DomainError::InvalidRegistry("no default".into()).is_client_error());
        assert!(!DomainError::InvalidTransition("init".into()).is_client_error());
    }
}
