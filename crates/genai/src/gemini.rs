//! Gemini `generateContent` REST backend.

use crate::model::{ContentPart, GenerateRequest, GenerateResponse, GenerativeModel, Modality};
use base64::Engine;
use deckgen_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GOOGLE_GEMINI_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a config with default endpoint, models and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key (required) and base URL (optional) from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::ConfigError(format!("{} is not set", API_KEY_ENV)))?;

        let mut config = Self::new(api_key.trim());
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(base_url.trim());
            }
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Endpoint for a `generateContent` call on `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Blocking Gemini client. Build it once and share it by reference.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.config.endpoint(&request.model);
        log::debug!("POST {} ({:?})", url, request.modalities);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&WireRequest::from(request))
            .send()
            .map_err(|e| Error::service(format!("Request to {} failed: {}", request.model, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let body = response
            .text()
            .map_err(|e| Error::service(format!("Failed to read response: {}", e)))?;
        parse_response(&body)
    }
}

/// Turn a non-success HTTP answer into an error.
///
/// 503s and "overloaded" messages become [`Error::ServiceOverloaded`].
fn classify_failure(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<WireErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == 503 || message.to_lowercase().contains("overloaded") {
        Error::ServiceOverloaded(message)
    } else {
        Error::Service {
            status: Some(status),
            message,
        }
    }
}

/// Parse a successful `generateContent` body into the parts of its first candidate.
fn parse_response(body: &str) -> Result<GenerateResponse> {
    let wire: WireResponse = serde_json::from_str(body)
        .map_err(|e| Error::service(format!("Malformed response: {}", e)))?;

    let candidate = wire
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::EmptyResponse("no candidates".to_string()))?;

    let mut parts = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(inline) = part.inline_data {
            let data = base64::engine::general_purpose::STANDARD
                .decode(inline.data.as_bytes())
                .map_err(|e| Error::service(format!("Invalid inline data: {}", e)))?;
            parts.push(ContentPart::InlineData {
                mime_type: inline.mime_type,
                data,
            });
        } else if let Some(text) = part.text {
            parts.push(ContentPart::Text(text));
        }
    }

    Ok(GenerateResponse::new(parts))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    parts: Vec<WireTextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct WireTextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_modalities: &'a [Modality],
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            contents: vec![WireContent {
                parts: vec![WireTextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: WireGenerationConfig {
                response_modalities: &request.modalities,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}
