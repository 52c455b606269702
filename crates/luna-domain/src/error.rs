//! Domain-level validation errors

use thiserror::Error;

/// Errors raised while building domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The question was empty or contained only whitespace
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// A field set name that is neither "simple" nor "full"
    #[error("Unknown field set: {0}")]
    UnknownFieldSet(String),
}
