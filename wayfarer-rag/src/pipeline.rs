//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the ingest-and-query workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], a [`Chunker`], and
//! an optional [`Reranker`]. Ingestion runs offline, once per corpus update;
//! at request time the chain is embed → search → rerank.
//!
//! # Example
//!
//! ```rust,ignore
//! use wayfarer_rag::{RagPipeline, RagConfig, InMemoryVectorStore, ParagraphChunker};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(ParagraphChunker::new()))
//!     .build()?;
//!
//! pipeline.create_collection("travel").await?;
//! pipeline.ingest_dir("travel", "./corpus").await?;
//! let results = pipeline.query("travel", "three days in Lisbon").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::reranker::Reranker;
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Coordinates corpus ingestion (chunk → embed → store) and query execution
/// (embed → search → rerank). All collaborators are injected once at
/// construction via [`RagPipeline::builder()`] and shared read-only.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Create a named collection in the vector store, sized to the
    /// embedding provider's dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the vector store operation fails.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
            RagError::Pipeline(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Delete a named collection from the vector store.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
            RagError::Pipeline(format!("failed to delete collection '{name}': {e}"))
        })
    }

    /// Ingest a single document: chunk → batch-embed → upsert.
    ///
    /// A document yielding zero chunks is a no-op, not an error. Returns the
    /// chunks that were stored, with embeddings attached.
    pub async fn ingest(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, "skipped document with no chunks");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!("embedding failed for document '{}': {e}", document.id))
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            RagError::Pipeline(format!("upsert failed for document '{}': {e}", document.id))
        })?;

        info!(document.id = %document.id, chunk_count = chunks.len(), "ingested document");
        Ok(chunks)
    }

    /// Ingest multiple documents through the chunk → embed → store workflow.
    ///
    /// Returns all chunks stored across all documents; fails on the first
    /// document that fails.
    pub async fn ingest_batch(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<Vec<Chunk>> {
        let mut all_chunks = Vec::new();
        for document in documents {
            let chunks = self.ingest(collection, document).await?;
            all_chunks.extend(chunks);
        }
        Ok(all_chunks)
    }

    /// Ingest every file in a corpus directory (one [`Document`] per file).
    ///
    /// Subdirectories are skipped. Files that chunk to nothing (empty or
    /// all-whitespace) are skipped without error. Chunk ids are the
    /// deterministic `{filename}_{ordinal}`, so re-running over an unchanged
    /// corpus replaces entries in place rather than duplicating them.
    ///
    /// Returns the total number of chunks stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Corpus`] if the directory cannot be enumerated or
    /// a file cannot be read as UTF-8 text.
    pub async fn ingest_dir(&self, collection: &str, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|source| RagError::Corpus { path: dir.to_path_buf(), source })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| RagError::Corpus { path: dir.to_path_buf(), source })?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| RagError::Corpus { path: entry.path(), source })?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        // Directory enumeration order is platform-dependent; sort for
        // deterministic logs and test runs.
        files.sort();

        let mut total_chunks = 0;
        for path in files {
            let Some(filename) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| RagError::Corpus { path: path.clone(), source })?;

            let document = Document::new(filename, text);
            total_chunks += self.ingest(collection, &document).await?.len();
        }

        info!(collection, corpus = %dir.display(), total_chunks, "corpus ingestion complete");
        Ok(total_chunks)
    }

    /// Rebuild a collection from a corpus directory.
    ///
    /// Drops and recreates the collection before ingesting, so chunks from
    /// files that shrank or disappeared do not linger.
    pub async fn reingest_dir(&self, collection: &str, dir: impl AsRef<Path>) -> Result<usize> {
        warn!(collection, "rebuilding collection from scratch");
        self.delete_collection(collection).await?;
        self.create_collection(collection).await?;
        self.ingest_dir(collection, dir).await
    }

    /// Retrieve the nearest chunks for a query, without reranking.
    ///
    /// Embeds the query and searches the store with the configured `top_k`,
    /// preserving the store's similarity order. Returns at most `top_k`
    /// rows; fewer if the collection holds fewer.
    pub async fn retrieve(&self, collection: &str, query: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_top_k(collection, query, self.config.top_k).await
    }

    /// Retrieve with an explicit `top_k`, bypassing the configured value.
    pub async fn retrieve_top_k(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        self.vector_store.search(collection, &query_embedding, top_k).await.map_err(|e| {
            error!(collection, error = %e, "vector store search failed");
            RagError::Pipeline(format!("search failed in collection '{collection}': {e}"))
        })
    }

    /// Query the pipeline: embed → search → rerank.
    ///
    /// Fetches `top_k` candidates from the store, then (if a reranker is
    /// configured) reorders them by cross-encoder relevance and truncates to
    /// `rerank_top_n`. Without a reranker the similarity order is returned
    /// unchanged.
    pub async fn query(&self, collection: &str, query: &str) -> Result<Vec<SearchResult>> {
        let results = self.retrieve(collection, query).await?;

        let results = match &self.reranker {
            Some(reranker) => {
                reranker.rerank(query, results, self.config.rerank_top_n).await.map_err(|e| {
                    error!(error = %e, "reranking failed");
                    RagError::Pipeline(format!("reranking failed: {e}"))
                })?
            }
            None => results,
        };

        info!(collection, result_count = results.len(), "query completed");
        Ok(results)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields except `reranker` are required.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set an optional cross-encoder reranker.
    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagPipeline {
            config,
            embedding_provider,
            vector_store,
            chunker,
            reranker: self.reranker,
        })
    }
}
