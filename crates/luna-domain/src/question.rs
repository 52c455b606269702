//! User questions

use crate::error::DomainError;
use std::fmt;

/// A question asked by the user.
///
/// The text is stored exactly as typed: no trimming, escaping or truncation.
/// The only rule is that it must contain something other than whitespace,
/// which lets callers reject empty input before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Validate and wrap a question
    ///
    /// # Examples
    ///
    /// ```
    /// use luna_domain::{DomainError, Question};
    ///
    /// let q = Question::new("How is my love life today?").unwrap();
    /// assert_eq!(q.as_str(), "How is my love life today?");
    ///
    /// assert_eq!(Question::new("   "), Err(DomainError::EmptyQuestion));
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        Ok(Self(text))
    }

    /// The question text, verbatim
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the question and return its text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
