//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default cap on question length, in characters.
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 1000;

/// A question asked by a student or teacher (Value Object)
///
/// Always non-empty after sanitization. Use [`Question::sanitized`] for raw
/// user input coming from a messaging channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Question cannot be empty");
        Self { content }
    }

    /// Try to create a new question, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Sanitize raw user input and build a question from it.
    ///
    /// - strips ASCII control characters and zero-width characters
    /// - collapses whitespace runs into a single space
    /// - collapses runs of 3+ identical `!?.,` into two
    /// - caps the length at `max_chars` characters
    pub fn sanitized(raw: &str, max_chars: usize) -> Result<Self, DomainError> {
        let content = sanitize_input(raw, max_chars);
        Self::try_new(content).ok_or_else(|| {
            DomainError::InvalidQuestion("question is empty after sanitization".to_string())
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }
}

fn sanitize_input(raw: &str, max_chars: usize) -> String {
    // Tabs and newlines are control characters too, but they separate words.
    let visible = raw.chars().filter(|c| {
        c.is_whitespace()
            || !matches!(
                *c,
                '\u{0000}'..='\u{001F}' | '\u{007F}' | '\u{200B}'..='\u{200D}' | '\u{FEFF}'
            )
    });

    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    for c in visible {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            run_char = None;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }

        if matches!(c, '!' | '?' | '.' | ',') {
            if run_char == Some(c) {
                run_len += 1;
            } else {
                run_char = Some(c);
                run_len = 1;
            }
            if run_len > 2 {
                continue;
            }
        } else {
            run_char = None;
        }
        out.push(c);
    }

    crate::util::truncate_chars(&out, max_chars).to_string()
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Question::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("What is 2+2?");
        assert_eq!(q.content(), "What is 2+2?");
    }

    #[test]
    #[should_panic]
    fn test_empty_question_panics() {
        Question::new("");
    }

    #[test]
    fn test_try_new_empty() {
        assert!(Question::try_new("").is_none());
        assert!(Question::try_new("   ").is_none());
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        let q = Question::sanitized("  Quem   é\n\to presidente?  ", 1000).unwrap();
        assert_eq!(q.content(), "Quem é o presidente?");
    }

    #[test]
    fn test_sanitize_strips_control_and_zero_width() {
        let q = Question::sanitized("Ol\u{200B}á\u{0007} mundo\u{FEFF}", 1000).unwrap();
        assert_eq!(q.content(), "Olá mundo");
    }

    #[test]
    fn test_sanitize_collapses_repeated_punctuation() {
        let q = Question::sanitized("Really?????? Yes!!!!! ok...", 1000).unwrap();
        assert_eq!(q.content(), "Really?? Yes!! ok..");
    }

    #[test]
    fn test_sanitize_keeps_mixed_punctuation() {
        let q = Question::sanitized("What?!?! now", 1000).unwrap();
        assert_eq!(q.content(), "What?!?! now");
    }

    #[test]
    fn test_sanitize_caps_length_in_chars() {
        let q = Question::sanitized(&"é".repeat(20), 5).unwrap();
        assert_eq!(q.content(), "ééééé");
    }

    #[test]
    fn test_sanitize_rejects_only_invisible() {
        let err = Question::sanitized("\u{200B}\n\t ", 1000).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuestion(_)));
    }
}
