//! The travel assistant service: retrieval-augmented question answering
//! over an ingested destination corpus.

use std::sync::Arc;

use tracing::info;

use wayfarer_model::{GenerationConfig, GenerationModel, GenerationOutcome, GenerationRequest};
use wayfarer_rag::{build_prompt, chunk_texts, RagPipeline};

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};

const DEFAULT_COLLECTION: &str = "default";

/// A fully answered query: the generation outcome plus the chunks that
/// grounded it, in the order they appeared in the prompt.
#[derive(Debug, Clone)]
pub struct Answer {
    pub outcome: GenerationOutcome,
    pub chunks: Vec<String>,
}

/// Retrieval-augmented travel assistant.
///
/// Holds a retrieval pipeline, a generation model, and an immutable
/// persona configuration. Each call to [`answer`](Self::answer) builds a
/// fresh per-request generation config, so concurrent queries never
/// observe each other's settings.
pub struct TravelAssistant {
    pipeline: Arc<RagPipeline>,
    model: Arc<dyn GenerationModel>,
    config: AssistantConfig,
    collection: String,
}

impl std::fmt::Debug for TravelAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelAssistant")
            .field("config", &self.config)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl TravelAssistant {
    pub fn builder() -> TravelAssistantBuilder {
        TravelAssistantBuilder::default()
    }

    /// The collection this assistant retrieves from.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create the backing collection and ingest every file in `dir`.
    ///
    /// Returns the total number of chunks stored.
    pub async fn ingest_corpus(&self, dir: impl AsRef<std::path::Path>) -> Result<usize> {
        self.pipeline.create_collection(&self.collection).await?;
        let count = self.pipeline.ingest_dir(&self.collection, dir).await?;
        Ok(count)
    }

    /// Rebuild the backing collection from `dir`, dropping stale chunks.
    pub async fn reingest_corpus(&self, dir: impl AsRef<std::path::Path>) -> Result<usize> {
        let count = self.pipeline.reingest_dir(&self.collection, dir).await?;
        Ok(count)
    }

    /// Answer a user query.
    ///
    /// Retrieves and reranks chunks, assembles the prompt under the
    /// configured persona, and sends it to the generation model with
    /// JSON output requested. The model's reply is parsed defensively:
    /// valid JSON becomes [`GenerationOutcome::Parsed`], anything else is
    /// carried through as [`GenerationOutcome::Unparsed`].
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let results = self.pipeline.query(&self.collection, query).await?;
        let chunks = chunk_texts(&results);
        info!(
            collection = %self.collection,
            chunks = chunks.len(),
            "answering query"
        );

        let prompt = build_prompt(&self.config.system_prompt, query, &chunks);
        let generation = GenerationConfig {
            json_output: true,
            response_schema: self.config.response_schema.clone(),
            temperature: None,
        };
        let request = GenerationRequest::with_config(prompt, generation);
        let text = self.model.generate(request).await?;

        Ok(Answer { outcome: GenerationOutcome::from_text(text), chunks })
    }
}

/// Builder for [`TravelAssistant`].
#[derive(Default)]
pub struct TravelAssistantBuilder {
    pipeline: Option<Arc<RagPipeline>>,
    model: Option<Arc<dyn GenerationModel>>,
    config: Option<AssistantConfig>,
    collection: Option<String>,
}

impl TravelAssistantBuilder {
    pub fn pipeline(mut self, pipeline: Arc<RagPipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn model(mut self, model: Arc<dyn GenerationModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the collection name. Defaults to `"default"`.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn build(self) -> Result<TravelAssistant> {
        let pipeline = self
            .pipeline
            .ok_or_else(|| AssistantError::Config("pipeline is required".to_string()))?;
        let model = self
            .model
            .ok_or_else(|| AssistantError::Config("model is required".to_string()))?;
        let config = self
            .config
            .ok_or_else(|| AssistantError::Config("config is required".to_string()))?;
        let collection = self.collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        Ok(TravelAssistant { pipeline, model, config, collection })
    }
}
