//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It is the default backend for development and
//! tests; production deployments use the durable [`qdrant`](crate::qdrant)
//! backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] using cosine similarity for search.
///
/// Collections are nested maps: collection name → chunk id → chunk. Because
/// entries are keyed by chunk id, upsert replaces any previous entry with
/// the same id.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, HashMap<String, Chunk>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity between two vectors.
///
/// Robust to non-normalized inputs; returns 0.0 if either vector has zero
/// magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn missing_collection(name: &str) -> RagError {
    RagError::VectorStore {
        backend: "in-memory".to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let entries =
            collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for chunk in chunks {
            entries.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let entries =
            collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for id in ids {
            entries.remove(*id);
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let entries = collections.get(collection).ok_or_else(|| missing_collection(collection))?;

        let mut scored: Vec<SearchResult> = entries
            .values()
            .map(|chunk| SearchResult {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn chunk(id_ordinal: usize, text: &str, embedding: Vec<f32>) -> Chunk {
        let doc = Document::new("t.txt", "");
        let mut c = Chunk::from_document(&doc, id_ordinal, text);
        c.embedding = embedding;
        c
    }

    #[tokio::test]
    async fn empty_collection_returns_empty() {
        let store = InMemoryVectorStore::new();
        store.create_collection("travel", 2).await.unwrap();
        let results = store.search("travel", &[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        store.create_collection("travel", 2).await.unwrap();

        store.upsert("travel", &[chunk(0, "old", vec![1.0, 0.0])]).await.unwrap();
        store.upsert("travel", &[chunk(0, "new", vec![1.0, 0.0])]).await.unwrap();

        let results = store.search("travel", &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "new");
    }

    #[tokio::test]
    async fn search_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store.create_collection("travel", 2).await.unwrap();
        store
            .upsert(
                "travel",
                &[chunk(0, "far", vec![0.0, 1.0]), chunk(1, "near", vec![1.0, 0.0])],
            )
            .await
            .unwrap();

        let results = store.search("travel", &[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results[0].chunk.text, "near");
        assert_eq!(results[1].chunk.text, "far");
    }
}
