//! The generation-model trait and per-request configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Per-request generation settings.
///
/// Built fresh for every request from the caller's (immutable) application
/// config; nothing here is shared or mutated across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Ask the gateway for a JSON-mime-typed completion.
    pub json_output: bool,
    /// Optional structured-output schema passed through to the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    /// Optional sampling temperature override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single completion request: the assembled prompt plus its settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    /// The fully assembled prompt string.
    pub prompt: String,
    /// Settings for this request.
    pub config: GenerationConfig,
}

impl GenerationRequest {
    /// Create a request with default settings.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), config: GenerationConfig::default() }
    }

    /// Create a request with explicit settings.
    pub fn with_config(prompt: impl Into<String>, config: GenerationConfig) -> Self {
        Self { prompt: prompt.into(), config }
    }
}

/// An opaque text-completion service.
///
/// The core hands over one assembled prompt and receives raw completion
/// text; whether that text is valid JSON is resolved afterwards by
/// [`GenerationOutcome`](crate::GenerationOutcome). Implementations bound
/// their own request latency (the gateway is an unbounded-latency external
/// call in practice).
#[async_trait]
pub trait GenerationModel: Send + Sync {
    /// The model identifier used for requests (e.g. `gemini-2.5-flash`).
    fn name(&self) -> &str;

    /// Generate completion text for the request.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Api`](crate::ModelError::Api) on network, auth,
    /// or quota failures. No retries are attempted; each request is
    /// at-most-once.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
