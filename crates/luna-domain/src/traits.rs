//! Trait definitions for external interactions
//!
//! These traits define the boundary between the reading pipeline and the
//! hosted model. Implementations live in `luna-llm`.

use serde::{Deserialize, Serialize};

/// Anything that exposes the text a model produced
pub trait GeneratedText {
    /// Raw model output
    fn text(&self) -> &str;
}

impl GeneratedText for String {
    fn text(&self) -> &str {
        self
    }
}

/// Generation settings sent along with a prompt.
///
/// The default is empty: the service picks its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// Trait for text-generation backends
///
/// Implemented by the infrastructure layer (luna-llm). Calls are synchronous:
/// `generate` blocks until the service answers or fails.
pub trait GenerationClient {
    /// Response type returned on success
    type Response: GeneratedText;

    /// Error type for generation failures
    type Error;

    /// Send one prompt as a single user message and return the model output
    fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Self::Response, Self::Error>;
}
