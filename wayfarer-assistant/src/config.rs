//! Persona configuration loaded from a static YAML resource.
//!
//! The file carries the assistant's `system_prompt` and an optional
//! `response_style.schema` for structured output. It is loaded once at
//! process start and never mutated afterwards; per-request generation
//! settings are derived from it as fresh values.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AssistantError, Result};

/// The immutable assistant configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// The persona/system text prepended to every prompt.
    pub system_prompt: String,
    /// Optional structured-output schema passed to the gateway.
    pub response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct RawConfig {
    system_prompt: Option<String>,
    response_style: Option<RawResponseStyle>,
}

#[derive(Deserialize)]
struct RawResponseStyle {
    schema: Option<serde_yaml::Value>,
}

impl AssistantConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::MissingKey`] if `system_prompt` is absent
    /// or empty (a fatal startup error) and [`AssistantError::Config`] for
    /// YAML that does not parse.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;

        let system_prompt = raw
            .system_prompt
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(AssistantError::MissingKey("system_prompt"))?;

        let response_schema = raw
            .response_style
            .and_then(|style| style.schema)
            .map(|schema| {
                serde_json::to_value(&schema)
                    .map_err(|e| AssistantError::Config(format!("schema is not JSON-shaped: {e}")))
            })
            .transpose()?;

        Ok(Self { system_prompt, response_schema })
    }

    /// Load configuration from a YAML file on disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path).await?;
        Self::from_yaml_str(&yaml)
    }
}
