//! Gemini Provider Implementation
//!
//! Calls the hosted Generative Language `generateContent` endpoint with one
//! user message and returns the text of the first candidate.
//!
//! # Features
//!
//! - Blocking HTTP communication (one request per call, no retries)
//! - Configurable base URL and timeout
//! - HTTP status mapped onto distinct [`LlmError`] variants
//!
//! # Examples
//!
//! ```no_run
//! use luna_llm::{ApiKey, GeminiProvider};
//! use luna_domain::{GeneratedText, GenerationClient, GenerationConfig};
//!
//! let provider = GeminiProvider::new(ApiKey::new("my-key")).unwrap();
//! let response = provider
//!     .generate("gemini-flash-lite-latest", "Say hello", &GenerationConfig::default())
//!     .unwrap();
//! println!("{}", response.text());
//! ```

use crate::LlmError;
use luna_domain::{GeneratedText, GenerationClient, GenerationConfig};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for generation requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// API credential. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the request header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Gemini API provider
pub struct GeminiProvider {
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
    client: Client,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "config_is_empty")]
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Text produced by a Gemini call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiResponse {
    text: String,
    finish_reason: Option<String>,
}

impl GeminiResponse {
    /// Why the model stopped (e.g. "STOP", "MAX_TOKENS")
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}

impl GeneratedText for GeminiResponse {
    fn text(&self) -> &str {
        &self.text
    }
}

impl GeminiProvider {
    /// Create a provider against the public endpoint
    pub fn new(api_key: ApiKey) -> Result<Self, LlmError> {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a provider with an explicit base URL and timeout
    pub fn with_options(
        api_key: ApiKey,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model_id)
    }
}

impl GenerationClient for GeminiProvider {
    type Response = GeminiResponse;
    type Error = LlmError;

    fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Self::Response, Self::Error> {
        let body = build_request(prompt, config);
        let url = self.endpoint(model_id);
        debug!(model = model_id, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&body)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), model = model_id, "Generation request failed");
            return Err(classify_status(status, model_id, &text));
        }

        parse_response(&text)
    }
}

fn config_is_empty(config: &&GenerationConfig) -> bool {
    config.is_empty()
}

fn build_request<'a>(prompt: &'a str, config: &'a GenerationConfig) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: config,
    }
}

fn classify_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(e.to_string())
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

fn classify_status(status: StatusCode, model_id: &str, body: &str) -> LlmError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    // An invalid key comes back as 400 with an API_KEY_INVALID reason
    let key_rejected = body.contains("API_KEY_INVALID");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(message),
        StatusCode::BAD_REQUEST if key_rejected => LlmError::Authentication(message),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model_id.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout(message),
        _ => {
            let message = match envelope.and_then(|e| e.error.status) {
                Some(code) => format!("{} ({})", message, code),
                None => message,
            };
            LlmError::Remote {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn parse_response(body: &str) -> Result<GeminiResponse, LlmError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {}", r))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(LlmError::InvalidResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse(format!(
            "candidate carried no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(GeminiResponse {
        text,
        finish_reason: candidate.finish_reason,
    })
}
