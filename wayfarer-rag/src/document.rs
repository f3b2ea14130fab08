//! Data types for corpus documents, chunks, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key carrying the source filename of a chunk.
pub const META_FILENAME: &str = "filename";
/// Metadata key carrying a chunk's 0-based ordinal within its source file.
pub const META_CHUNK_ID: &str = "chunk_id";

/// A source file from the travel corpus.
///
/// Documents are read once during ingestion and never mutated. The `id` is
/// the corpus filename, which anchors the identity of every chunk derived
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document (the corpus filename).
    pub id: String,
    /// The full UTF-8 text content of the file.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new() }
    }

    /// Create a document with metadata.
    pub fn with_metadata(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self { id: id.into(), text: text.into(), metadata }
    }
}

/// A paragraph-level segment of a [`Document`] with its vector embedding.
///
/// Chunk identity is `{filename}_{ordinal}`, unique across a collection and
/// stable across re-ingestion of identical content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier: `{document_id}_{ordinal}`.
    pub id: String,
    /// The trimmed, non-empty text of the chunk.
    pub text: String,
    /// The L2-normalized embedding for this chunk's text. Empty until the
    /// pipeline attaches one.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document plus `filename` and
    /// `chunk_id` fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// Build the chunk at `ordinal` within `document`.
    ///
    /// Inherits the document metadata and records the `filename` and
    /// `chunk_id` keys the store indexes on. The embedding starts empty.
    pub fn from_document(document: &Document, ordinal: usize, text: impl Into<String>) -> Self {
        let mut metadata = document.metadata.clone();
        metadata.insert(META_FILENAME.to_string(), document.id.clone());
        metadata.insert(META_CHUNK_ID.to_string(), ordinal.to_string());

        Self {
            id: format!("{}_{ordinal}", document.id),
            text: text.into(),
            embedding: Vec::new(),
            metadata,
            document_id: document.id.clone(),
        }
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
///
/// Before reranking the score is the store's similarity; after reranking it
/// is the cross-encoder relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}

/// Extract the chunk texts from a result list, preserving order.
pub fn chunk_texts(results: &[SearchResult]) -> Vec<String> {
    results.iter().map(|r| r.chunk.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_identity_is_filename_and_ordinal() {
        let doc = Document::new("kyoto.txt", "some text");
        let chunk = Chunk::from_document(&doc, 3, "some text");
        assert_eq!(chunk.id, "kyoto.txt_3");
        assert_eq!(chunk.document_id, "kyoto.txt");
        assert_eq!(chunk.metadata[META_FILENAME], "kyoto.txt");
        assert_eq!(chunk.metadata[META_CHUNK_ID], "3");
        assert!(chunk.embedding.is_empty());
    }

    #[test]
    fn chunk_texts_preserves_order() {
        let doc = Document::new("d", "");
        let results = vec![
            SearchResult { chunk: Chunk::from_document(&doc, 0, "first"), score: 0.2 },
            SearchResult { chunk: Chunk::from_document(&doc, 1, "second"), score: 0.9 },
        ];
        assert_eq!(chunk_texts(&results), vec!["first", "second"]);
    }
}
