//! Configuration for the Oracle

use crate::error::OracleError;
use crate::prompt::DEFAULT_QUESTION_LABEL;
use luna_domain::FieldSet;
use luna_llm::gemini::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use luna_llm::ApiKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Generation API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum time for a single generation call (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional instruction file; the built-in text is used when it is absent
    #[serde(default = "default_instruction_path")]
    pub instruction_path: PathBuf,

    /// Label placed before the question in the prompt
    #[serde(default = "default_question_label")]
    pub question_label: String,

    /// Which fields the presenters show and the default instruction asks for
    #[serde(default)]
    pub variant: FieldSet,
}

impl OracleConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fields for the configured variant
    pub fn fields(&self) -> FieldSet {
        self.variant
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.model.trim().is_empty() {
            return Err(OracleError::InvalidConfig("model must not be empty".to_string()));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(OracleError::InvalidConfig(
                "api_key_env must name an environment variable".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(OracleError::InvalidConfig(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(OracleError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Resolve the API key from the process environment
    pub fn api_key(&self) -> Result<ApiKey, OracleError> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key through `lookup`. A missing or blank value is a
    /// configuration error.
    pub fn api_key_with<F>(&self, lookup: F) -> Result<ApiKey, OracleError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(ApiKey::new(key.trim())),
            _ => Err(OracleError::Configuration(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))),
        }
    }
}

impl Default for OracleConfig {
    /// The six-field variant against the public endpoint
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            instruction_path: default_instruction_path(),
            question_label: default_question_label(),
            variant: FieldSet::Full,
        }
    }
}

impl OracleConfig {
    /// Simple preset: summary, advice and lucky item only
    pub fn simple() -> Self {
        Self {
            variant: FieldSet::Simple,
            ..Self::default()
        }
    }

    /// Full preset: all six fields
    pub fn full() -> Self {
        Self::default()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, OracleError> {
        toml::from_str(toml_str)
            .map_err(|e| OracleError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, OracleError> {
        toml::to_string_pretty(self)
            .map_err(|e| OracleError::InvalidConfig(format!("Failed to serialize to TOML: {}", e)))
    }
}

fn default_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_instruction_path() -> PathBuf {
    PathBuf::from("text").join("system_prompt.txt")
}

fn default_question_label() -> String {
    DEFAULT_QUESTION_LABEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OracleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gemini-flash-lite-latest");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.fields(), FieldSet::Full);
    }

    #[test]
    fn test_simple_config_is_valid() {
        let config = OracleConfig::simple();
        assert!(config.validate().is_ok());
        assert_eq!(config.fields(), FieldSet::Simple);
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = OracleConfig::default();
        config.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(OracleError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = OracleConfig::default();
        config.base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model() {
        let mut config = OracleConfig::default();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let config = OracleConfig::default();
        let result = config.api_key_with(|_| None);
        match result {
            Err(OracleError::Configuration(msg)) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_api_key_is_configuration_error() {
        let config = OracleConfig::default();
        assert!(matches!(
            config.api_key_with(|_| Some("   ".to_string())),
            Err(OracleError::Configuration(_))
        ));
    }

    #[test]
    fn test_api_key_lookup_uses_configured_variable() {
        let mut config = OracleConfig::default();
        config.api_key_env = "LUNA_KEY".to_string();
        let key = config
            .api_key_with(|name| (name == "LUNA_KEY").then(|| "abc".to_string()))
            .unwrap();
        assert_eq!(key.expose(), "abc");
    }

    #[test]
    fn test_unset_process_variable() {
        let mut config = OracleConfig::default();
        config.api_key_env = "LUNA_TEST_VARIABLE_THAT_IS_NEVER_SET".to_string();
        assert!(matches!(config.api_key(), Err(OracleError::Configuration(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OracleConfig::simple();
        let toml_str = config.to_toml().unwrap();
        let parsed = OracleConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = OracleConfig::from_toml(
            r#"
            model = "gemini-2.0-flash"
            variant = "simple"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.model, "gemini-2.0-flash");
        assert_eq!(parsed.variant, FieldSet::Simple);
        assert_eq!(parsed.api_key_env, "GEMINI_API_KEY");
        assert_eq!(parsed.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_bad_toml() {
        assert!(OracleConfig::from_toml("variant = \"tarot\"").is_err());
    }
}
