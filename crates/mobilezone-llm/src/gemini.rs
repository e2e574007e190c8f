//! Gemini Provider Implementation
//!
//! Provides integration with Google's Gemini `generateContent` API, using the
//! Google Search tool for grounding and a JSON response schema so the model
//! answers with a `{ summary, phones }` payload.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini REST API
//! - Configurable endpoint, model, and market
//! - Retry logic with exponential backoff for transport, 429, and 5xx errors
//! - Optional request timeout (unset by default)
//!
//! # Examples
//!
//! ```no_run
//! use mobilezone_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-3-flash-preview").unwrap();
//! // `search` is async; call it from a tokio runtime
//! ```

use crate::ProviderError;
use async_trait::async_trait;
use mobilezone_domain::traits::{ProviderReply, SearchProvider, SourceRef};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default market the prompt asks prices for
pub const DEFAULT_MARKET: &str = "Pakistan";

/// Default number of attempts per search
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the Gemini provider
///
/// The API key is deliberately not part of the config; it is read from the
/// environment by the caller and passed to [`GeminiProvider::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Market named in the prompt
    #[serde(default = "default_market")]
    pub market: String,

    /// Attempts per search (at least 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout in seconds, none by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_market() -> String {
    DEFAULT_MARKET.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            market: default_market(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Gemini API provider for grounded market search
pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    tools: Vec<Value>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider with default settings
    ///
    /// # Parameters
    ///
    /// - `api_key`: Gemini API key
    /// - `model`: Model to use (e.g., "gemini-3-flash-preview")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        let config = GeminiConfig {
            model: model.into(),
            ..GeminiConfig::default()
        };
        Self::from_config(config, api_key)
    }

    /// Create a provider from a full configuration
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Config` if the configuration is invalid, the
    /// API key is empty, or the HTTP client cannot be built.
    pub fn from_config(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        config.validate().map_err(ProviderError::Config)?;

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("API key is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries.max(1);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, query: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: build_prompt(query, &self.config.market),
                }],
            }],
            tools: vec![json!({ "google_search": {} })],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    /// Run one search against the API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API is unreachable after all retries
    /// - The key is rejected or the model does not exist
    /// - The response body is not a generateContent response
    pub async fn generate(&self, query: &str) -> Result<ProviderReply, ProviderError> {
        let url = self.url();
        let request_body = self.build_request(query);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            debug!("Gemini request attempt {} for '{}'", attempts + 1, query);

            match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return match response.json::<GenerateResponse>().await {
                            Ok(body) => Ok(into_reply(body)),
                            Err(e) => Err(ProviderError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    match status {
                        StatusCode::NOT_FOUND => {
                            return Err(ProviderError::ModelNotAvailable(self.config.model.clone()));
                        }
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            return Err(ProviderError::Auth(format!("HTTP {}", status)));
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(ProviderError::RateLimitExceeded);
                        }
                        s if s.is_server_error() => {
                            last_error = Some(ProviderError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                        _ => {
                            return Err(ProviderError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(ProviderError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Gemini request failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl SearchProvider for GeminiProvider {
    type Error = ProviderError;

    async fn search(&self, query: &str) -> Result<ProviderReply, Self::Error> {
        self.generate(query).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Prompt asking for phones matching `query` in `market`
fn build_prompt(query: &str, market: &str) -> String {
    format!(
        "Find information about mobile phones matching this query: \"{}\". \
         Focus on latest prices in {}, key specs, and release dates.",
        query, market
    )
}

/// JSON schema the model must answer with
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "phones": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "brand": { "type": "STRING" },
                        "price": { "type": "NUMBER" },
                        "processor": { "type": "STRING" },
                        "ram": { "type": "STRING" },
                        "camera": { "type": "STRING" },
                        "battery": { "type": "STRING" }
                    },
                    "required": ["name", "brand", "price"]
                }
            }
        }
    })
}

/// Flatten the first candidate into a provider reply
fn into_reply(response: GenerateResponse) -> ProviderReply {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return ProviderReply::default();
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .map(|chunk| match chunk.web {
                    Some(web) => SourceRef::new(web.title, web.uri),
                    None => SourceRef::default(),
                })
                .collect()
        })
        .unwrap_or_default();

    ProviderReply {
        text: if text.trim().is_empty() { None } else { Some(text) },
        sources,
    }
}
