//! Luna LLM Provider Layer
//!
//! Implementations of the `GenerationClient` trait from `luna-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Hosted Gemini `generateContent` API
//!
//! # Examples
//!
//! ```
//! use luna_llm::MockProvider;
//! use luna_domain::{GeneratedText, GenerationClient, GenerationConfig};
//!
//! let provider = MockProvider::new(r#"{"summary": "A bright day"}"#);
//! let response = provider
//!     .generate("gemini-flash-lite-latest", "any prompt", &GenerationConfig::default())
//!     .unwrap();
//! assert_eq!(response.text(), r#"{"summary": "A bright day"}"#);
//! ```

#![warn(missing_docs)]

pub mod gemini;

use luna_domain::{GeneratedText, GenerationClient, GenerationConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use gemini::{ApiKey, GeminiProvider, GeminiResponse};

/// Errors that can occur while calling a generation service.
///
/// Each remote failure mode has its own variant; none of them is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or connection failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Credential missing, invalid or not allowed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The service answered with an error status
    #[error("Remote error (HTTP {status}): {message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Error message reported by the service
        message: String,
    },

    /// Response body could not be decoded or carried no text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Text returned by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse(String);

impl GeneratedText for MockResponse {
    fn text(&self) -> &str {
        &self.0
    }
}

/// One recorded call to [`MockProvider::generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Model identifier passed by the caller
    pub model_id: String,
    /// Full prompt text
    pub prompt: String,
    /// Generation settings
    pub config: GenerationConfig,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls and
/// records every call it receives. Clones share their state.
///
/// # Examples
///
/// ```
/// use luna_llm::{LlmError, MockProvider};
/// use luna_domain::{GeneratedText, GenerationClient, GenerationConfig};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_error("prompt2", LlmError::Timeout("slow".into()));
///
/// let config = GenerationConfig::default();
/// assert_eq!(provider.generate("m", "prompt1", &config).unwrap().text(), "response1");
/// assert!(provider.generate("m", "prompt2", &config).is_err());
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    errors: Arc<Mutex<HashMap<String, LlmError>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            errors: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        lock(&self.errors).insert(prompt.into(), error);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// The most recent call, if any
    pub fn last_call(&self) -> Option<MockCall> {
        lock(&self.calls).last().cloned()
    }

    /// Reset the call log
    pub fn reset_call_count(&self) {
        lock(&self.calls).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl GenerationClient for MockProvider {
    type Response = MockResponse;
    type Error = LlmError;

    fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Self::Response, Self::Error> {
        lock(&self.calls).push(MockCall {
            model_id: model_id.to_string(),
            prompt: prompt.to_string(),
            config: config.clone(),
        });

        if let Some(error) = lock(&self.errors).get(prompt) {
            return Err(error.clone());
        }

        let responses = lock(&self.responses);
        let text = responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());
        Ok(MockResponse(text))
    }
}
