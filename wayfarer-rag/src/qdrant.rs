//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`], a durable [`VectorStore`] backed by the
//! [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC. This is
//! the production backend: the store survives process restarts and is shared
//! between the offline ingestion job and request-time queries.
//!
//! Only available with the `qdrant` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use wayfarer_rag::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.create_collection("travel", 384).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointStruct, PointsIdsList,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A durable [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections are created with cosine distance, matching the normalized
/// vectors the embedding provider produces. Qdrant point ids must be UUIDs
/// or integers, so each chunk's `{filename}_{ordinal}` id is mapped to a
/// deterministic UUIDv5; the original id travels in the payload. The same
/// chunk id therefore always maps to the same point, which makes upsert a
/// true replace and re-ingestion idempotent.
pub struct QdrantVectorStore {
    client: Qdrant,
}

/// Namespace for deriving point UUIDs from chunk ids.
const POINT_NAMESPACE: Uuid = Uuid::NAMESPACE_URL;

fn point_uuid(chunk_id: &str) -> String {
    Uuid::new_v5(&POINT_NAMESPACE, chunk_id.as_bytes()).to_string()
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStore { backend: "qdrant".to_string(), message: e.to_string() }
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn payload_for(chunk: &Chunk) -> Payload {
        let mut map = serde_json::Map::new();
        map.insert("chunk_id".to_string(), serde_json::Value::String(chunk.id.clone()));
        map.insert("text".to_string(), serde_json::Value::String(chunk.text.clone()));
        map.insert(
            "document_id".to_string(),
            serde_json::Value::String(chunk.document_id.clone()),
        );
        let metadata: serde_json::Map<String, serde_json::Value> = chunk
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        map.insert("metadata".to_string(), serde_json::Value::Object(metadata));

        Payload::try_from(serde_json::Value::Object(map)).unwrap_or_default()
    }

    fn chunk_from_payload(payload: &HashMap<String, QdrantValue>) -> Chunk {
        let field =
            |key: &str| payload.get(key).and_then(Self::extract_string).unwrap_or_default();

        let metadata: HashMap<String, String> = payload
            .get("metadata")
            .and_then(|v| match &v.kind {
                Some(Kind::StructValue(s)) => Some(
                    s.fields
                        .iter()
                        .filter_map(|(k, v)| Self::extract_string(v).map(|s| (k.clone(), s)))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default();

        Chunk {
            id: field("chunk_id"),
            text: field("text"),
            embedding: Vec::new(),
            metadata,
            document_id: field("document_id"),
        }
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        if collections.collections.iter().any(|c| c.name == name) {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.client.delete_collection(name).await.map_err(Self::map_err)?;
        debug!(collection = name, "deleted qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .iter()
            .map(|chunk| {
                PointStruct::new(
                    point_uuid(&chunk.id),
                    chunk.embedding.clone(),
                    Self::payload_for(chunk),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let point_ids: Vec<qdrant_client::qdrant::PointId> =
            ids.iter().map(|id| point_uuid(id).into()).collect();

        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(PointsIdsList { ids: point_ids })
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = ids.len(), "deleted points from qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| SearchResult {
                chunk: Self::chunk_from_payload(&scored.payload),
                score: scored.score,
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_uuid_is_deterministic() {
        assert_eq!(point_uuid("kyoto.txt_0"), point_uuid("kyoto.txt_0"));
        assert_ne!(point_uuid("kyoto.txt_0"), point_uuid("kyoto.txt_1"));
    }
}
