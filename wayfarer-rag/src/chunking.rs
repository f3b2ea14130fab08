//! Document chunking.
//!
//! The corpus consists of plain-text travel guides where paragraphs are the
//! natural retrieval unit, so the primary implementation is
//! [`ParagraphChunker`], which splits on blank-line boundaries.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings; embeddings are attached later by the pipeline. Chunking is a
/// pure function of the document text: ordinals are 0-based positions in the
/// produced sequence and stable under re-ingestion of identical content.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` for a document whose text contains nothing
    /// retrievable.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into paragraphs on blank-line (`\n\n`) boundaries.
///
/// Each candidate paragraph is trimmed of leading and trailing whitespace;
/// empty candidates are dropped. A document with no blank lines yields
/// exactly one chunk, and an all-whitespace document yields none.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphChunker;

impl ParagraphChunker {
    /// Create a new `ParagraphChunker`.
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        document
            .text
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .enumerate()
            .map(|(ordinal, paragraph)| Chunk::from_document(document, ordinal, paragraph))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_texts(text: &str) -> Vec<String> {
        let doc = Document::new("guide.txt", text);
        ParagraphChunker::new().chunk(&doc).into_iter().map(|c| c.text).collect()
    }

    #[test]
    fn splits_on_blank_lines_and_trims() {
        let texts = chunk_texts("  First paragraph.  \n\nSecond paragraph.\n");
        assert_eq!(texts, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn drops_empty_candidates() {
        let texts = chunk_texts("a\n\n\n\n   \n\nb");
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn document_without_blank_lines_is_one_chunk() {
        let texts = chunk_texts("single line\nstill the same paragraph");
        assert_eq!(texts.len(), 1);
    }

    #[test]
    fn empty_and_whitespace_documents_yield_nothing() {
        assert!(chunk_texts("").is_empty());
        assert!(chunk_texts("   \n\t  ").is_empty());
    }

    #[test]
    fn ordinals_are_stable_positions() {
        let doc = Document::new("guide.txt", "a\n\nb\n\nc");
        let chunks = ParagraphChunker::new().chunk(&doc);
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["guide.txt_0", "guide.txt_1", "guide.txt_2"]);
    }
}
