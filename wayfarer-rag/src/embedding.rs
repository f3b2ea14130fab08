//! Embedding provider trait for mapping text to dense vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text (chunks or queries) to fixed-length dense
/// vectors.
///
/// This is the text-encoder seam of the pipeline: implementations are
/// constructed once at application start (model load paid up front, failure
/// is fatal) and shared by reference afterwards. Loaded models are treated
/// as read-only.
///
/// # Contract
///
/// - Every returned vector is L2-normalized (unit length within 1e-5), so
///   cosine similarity reduces to a dot product in the vector store.
/// - `embed_batch(texts)[i]` is numerically equivalent to `embed(texts[i])`
///   for the same text.
///
/// # Example
///
/// ```rust,ignore
/// use wayfarer_rag::EmbeddingProvider;
///
/// let embedding = provider.embed("best season to visit Hokkaido").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a normalized embedding vector for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate normalized embedding vectors for a batch of texts.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input, which trivially satisfies the
    /// batch/single equivalence contract. Backends with native batching may
    /// override it as long as equivalence holds.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
