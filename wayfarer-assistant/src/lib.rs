//! # Wayfarer Assistant
//!
//! The service layer of the Wayfarer travel planner: a retrieval-augmented
//! assistant that answers trip-planning questions grounded in an ingested
//! destination corpus.
//!
//! The assistant wires together a [`wayfarer_rag::RagPipeline`] for
//! retrieval and a [`wayfarer_model::GenerationModel`] for generation,
//! under a persona loaded from YAML configuration.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfarer_assistant::{AssistantConfig, TravelAssistant};
//! use wayfarer_model::GeminiModel;
//! use wayfarer_rag::{
//!     InMemoryVectorStore, ParagraphChunker, RagConfig, RagPipeline,
//! };
//!
//! # async fn run(embedder: Arc<dyn wayfarer_rag::EmbeddingProvider>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(embedder)
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(ParagraphChunker))
//!     .build()?;
//!
//! let assistant = TravelAssistant::builder()
//!     .pipeline(Arc::new(pipeline))
//!     .model(Arc::new(GeminiModel::from_env()?))
//!     .config(AssistantConfig::from_path("travel_assistant.yaml").await?)
//!     .build()?;
//!
//! assistant.ingest_corpus("corpus/").await?;
//! let answer = assistant.answer("Three days in Lisbon on a budget?").await?;
//! println!("{}", answer.outcome.into_value());
//! # Ok(())
//! # }
//! ```

mod assistant;
mod config;
mod error;

pub use assistant::{Answer, TravelAssistant, TravelAssistantBuilder};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
