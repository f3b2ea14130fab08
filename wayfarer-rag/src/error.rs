//! Error types for the `wayfarer-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation or model load.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during cross-encoder scoring.
    #[error("reranker error: {0}")]
    Reranker(String),

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error in the RAG pipeline orchestration.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// A corpus file could not be read during ingestion.
    #[error("failed to read corpus file {path}: {source}")]
    Corpus {
        /// Path of the offending file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
