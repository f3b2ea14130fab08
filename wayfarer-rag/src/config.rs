//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the RAG pipeline.
///
/// Paragraph chunking has no size knobs; the tunables are the retrieval
/// depth and the reranked context size handed to the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of nearest chunks fetched from the vector store per query.
    pub top_k: usize,
    /// Number of chunks kept after cross-encoder reranking.
    pub rerank_top_n: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 10, rerank_top_n: 3 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of chunks fetched from the vector store.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the number of chunks kept after reranking.
    pub fn rerank_top_n(mut self, n: usize) -> Self {
        self.config.rerank_top_n = n;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k` or `rerank_top_n` is zero.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.rerank_top_n == 0 {
            return Err(RagError::Config("rerank_top_n must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_request_chain() {
        let config = RagConfig::default();
        assert_eq!(config.top_k, 10);
        assert_eq!(config.rerank_top_n, 3);
    }

    #[test]
    fn rejects_zero_top_k() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
        assert!(RagConfig::builder().rerank_top_n(0).build().is_err());
        assert!(RagConfig::builder().top_k(5).rerank_top_n(2).build().is_ok());
    }
}
