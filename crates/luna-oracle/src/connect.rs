//! Provider construction from configuration

use crate::config::OracleConfig;
use crate::error::OracleError;
use luna_llm::GeminiProvider;

/// Build a Gemini provider for `config`.
///
/// The credential is checked first, so a missing key surfaces as
/// [`OracleError::Configuration`] before anything touches the network.
/// Building the provider itself sends no request.
pub fn connect_gemini(config: &OracleConfig) -> Result<GeminiProvider, OracleError> {
    config.validate()?;
    let api_key = config.api_key()?;
    let provider =
        GeminiProvider::with_options(api_key, config.base_url.clone(), config.request_timeout())?;
    Ok(provider)
}
