//! Gemini generation gateway over the REST API.
//!
//! Calls `models/{model}:generateContent` on the Generative Language API
//! with `reqwest`. Only available with the `gemini` feature (enabled by
//! default).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::model::{GenerationModel, GenerationRequest};

/// Base URL of the Generative Language API.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default bound on a single generation request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`GenerationModel`] backed by the Gemini REST API.
///
/// The client is constructed once at startup; a missing or empty API key is
/// a fatal configuration error. Every request carries a bounded timeout.
///
/// # Example
///
/// ```rust,ignore
/// use wayfarer_model::gemini::GeminiModel;
///
/// let model = GeminiModel::new(std::env::var("GEMINI_API_KEY")?, "gemini-2.5-flash")?;
/// let text = model.generate(GenerationRequest::new(prompt)).await?;
/// ```
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    /// Create a new Gemini client with the given API key and model name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the API key is empty or the HTTP
    /// client cannot be constructed.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, model, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Config("Gemini API key must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable,
    /// using the model from `GEMINI_MODEL` or the default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            ModelError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// Override the API base URL (test servers, regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_error(message: impl Into<String>) -> ModelError {
        ModelError::Api { provider: "gemini".to_string(), message: message.into() }
    }

    fn invalid_response(message: impl Into<String>) -> ModelError {
        ModelError::InvalidResponse { provider: "gemini".to_string(), message: message.into() }
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── GenerationModel implementation ─────────────────────────────────

#[async_trait]
impl GenerationModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let generation_config = if request.config.json_output
            || request.config.response_schema.is_some()
            || request.config.temperature.is_some()
        {
            Some(ApiGenerationConfig {
                response_mime_type: request.config.json_output.then_some("application/json"),
                response_schema: request.config.response_schema.clone(),
                temperature: request.config.temperature,
            })
        } else {
            None
        };

        let body = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: &request.prompt }] }],
            generation_config,
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, prompt_len = request.prompt.len(), "calling gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "gemini request failed");
                Self::api_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "gemini API error");
            return Err(Self::api_error(format!("API returned {status}: {detail}")));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse gemini response envelope");
            Self::invalid_response(format!("failed to parse response: {e}"))
        })?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content.parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().concat()
            })
            .ok_or_else(|| Self::invalid_response("response contained no candidates"))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let result = GeminiModel::new("", DEFAULT_MODEL);
        assert!(matches!(result, Err(ModelError::Config(_))));
    }

    #[test]
    fn model_name_is_reported() {
        let model = GeminiModel::new("test-key", "gemini-2.5-pro").unwrap();
        assert_eq!(model.name(), "gemini-2.5-pro");
    }
}
