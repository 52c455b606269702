//! Error types for the Oracle

use luna_domain::DomainError;
use luna_llm::LlmError;
use thiserror::Error;

/// The model output could not be reduced to a JSON object.
///
/// Both variants keep the raw response so a presenter can show it verbatim.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No `{ ... }` span in the text
    #[error("No JSON object found in model response")]
    NoJsonObject {
        /// Original model output
        raw: String,
    },

    /// A brace span was found but is not valid JSON
    #[error("Invalid JSON in model response: {source}")]
    Parse {
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
        /// Original model output
        raw: String,
    },
}

impl ExtractionError {
    /// The model output that failed to parse
    pub fn raw(&self) -> &str {
        match self {
            ExtractionError::NoJsonObject { raw } | ExtractionError::Parse { raw, .. } => raw,
        }
    }
}

/// Errors that can occur while producing a reading
#[derive(Error, Debug)]
pub enum OracleError {
    /// The question was empty; no request was made
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// Required configuration (the credential) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The generation service failed
    #[error(transparent)]
    Remote(#[from] LlmError),

    /// The response could not be turned into a reading
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Instruction file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OracleError {
    /// Raw model output, when the failure happened after generation
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            OracleError::Extraction(e) => Some(e.raw()),
            _ => None,
        }
    }
}

impl From<DomainError> for OracleError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyQuestion => OracleError::EmptyQuestion,
            other => OracleError::InvalidConfig(other.to_string()),
        }
    }
}
