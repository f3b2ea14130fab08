//! # wayfarer-rag
//!
//! Retrieval-Augmented Generation core for the Wayfarer travel assistant.
//!
//! The crate covers the pipeline from corpus to prompt: paragraph chunking,
//! embedding, vector storage, top-K retrieval, cross-encoder reranking, and
//! prompt assembly. The generative call itself lives behind the
//! `wayfarer-model` boundary.
//!
//! ## Overview
//!
//! - [`ParagraphChunker`] splits corpus files on blank-line boundaries.
//! - [`EmbeddingProvider`] maps chunk and query text to L2-normalized
//!   vectors.
//! - [`VectorStore`] persists chunk vectors and answers nearest-neighbor
//!   queries ([`InMemoryVectorStore`] for development, a Qdrant backend
//!   behind the `qdrant` feature for production).
//! - [`RagPipeline`] orchestrates ingestion (chunk → embed → upsert) and
//!   query execution (embed → search → rerank).
//! - [`CrossEncoderReranker`] reorders candidates with a [`PairScorer`]
//!   relevance model.
//! - [`build_prompt`] merges persona, query, and ranked chunks into the
//!   completion prompt.
//!
//! ## Features
//!
//! - `qdrant` - durable vector store backend over gRPC.
//! - `onnx` - local ONNX Runtime embedding and cross-encoder models.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wayfarer_rag::{
//!     InMemoryVectorStore, ParagraphChunker, RagConfig, RagPipeline,
//! };
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(embedder)
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(ParagraphChunker::new()))
//!     .build()?;
//!
//! pipeline.create_collection("travel").await?;
//! pipeline.ingest_dir("travel", "./corpus").await?;
//! let results = pipeline.query("travel", "weekend in Porto").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod pipeline;
pub mod prompt;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod reranker;
pub mod vectorstore;

pub use chunking::{Chunker, ParagraphChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult, chunk_texts};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "onnx")]
pub use onnx::{OnnxCrossEncoder, OnnxEmbeddingProvider};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::build_prompt;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
pub use reranker::{CrossEncoderReranker, NoOpReranker, PairScorer, Reranker};
pub use vectorstore::VectorStore;
