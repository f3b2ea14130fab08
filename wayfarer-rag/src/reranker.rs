//! Cross-encoder reranking of retrieval results.
//!
//! Vector similarity is a fast first pass; a cross-encoder that jointly
//! encodes each (query, candidate) pair is more precise. [`PairScorer`] is
//! the injected scoring-model seam, and [`CrossEncoderReranker`] applies it
//! to reorder retrieval results.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::{RagError, Result};

/// A relevance model that scores (query, candidate) pairs jointly.
///
/// Like the embedding provider, implementations are constructed once at
/// application start and shared read-only afterwards.
#[async_trait]
pub trait PairScorer: Send + Sync {
    /// Score every candidate against the query. Returns one score per
    /// candidate, in candidate order (higher is more relevant).
    async fn score_pairs(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>>;
}

/// A reranker that re-scores and reorders search results.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank `results` for `query` and truncate to at most `top_n` rows.
    async fn rerank(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        top_n: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// A no-op reranker that keeps the retrieval order, truncated to `top_n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(
        &self,
        _query: &str,
        mut results: Vec<SearchResult>,
        top_n: usize,
    ) -> Result<Vec<SearchResult>> {
        results.truncate(top_n);
        Ok(results)
    }
}

/// A [`Reranker`] backed by a cross-encoder [`PairScorer`].
///
/// Scores every (query, candidate) pair, sorts by score descending with a
/// stable sort (ties keep their retrieval order), and truncates to `top_n`.
/// An empty input returns empty without invoking the scoring model. A
/// scorer that returns a different number of scores than candidates is
/// rejected with [`RagError::Reranker`] rather than mixing score scales.
#[derive(Debug)]
pub struct CrossEncoderReranker<S: PairScorer> {
    scorer: S,
}

impl<S: PairScorer> CrossEncoderReranker<S> {
    /// Create a reranker around the given scoring model.
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl<S: PairScorer> Reranker for CrossEncoderReranker<S> {
    async fn rerank(
        &self,
        query: &str,
        mut results: Vec<SearchResult>,
        top_n: usize,
    ) -> Result<Vec<SearchResult>> {
        if results.is_empty() {
            return Ok(results);
        }

        let candidates: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let scores = self.scorer.score_pairs(query, &candidates).await?;
        if scores.len() != results.len() {
            return Err(RagError::Reranker(format!(
                "scorer returned {} scores for {} candidates",
                scores.len(),
                results.len()
            )));
        }

        for (result, score) in results.iter_mut().zip(scores) {
            result.score = score;
        }

        // Vec::sort_by is stable, so equal scores keep retrieval order.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_n);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::document::{Chunk, Document};

    fn result(ordinal: usize, text: &str) -> SearchResult {
        let doc = Document::new("t.txt", "");
        SearchResult { chunk: Chunk::from_document(&doc, ordinal, text), score: 0.0 }
    }

    /// Scores candidates by whether they contain the query; counts calls.
    struct ContainsScorer {
        calls: AtomicUsize,
    }

    impl ContainsScorer {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl PairScorer for ContainsScorer {
        async fn score_pairs(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(candidates.iter().map(|c| if c.contains(query) { 1.0 } else { 0.0 }).collect())
        }
    }

    #[tokio::test]
    async fn empty_input_skips_the_scorer() {
        let scorer = ContainsScorer::new();
        let reranker = CrossEncoderReranker::new(scorer);
        let out = reranker.rerank("anything", Vec::new(), 5).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(reranker.scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn singleton_input_is_idempotent() {
        let reranker = CrossEncoderReranker::new(ContainsScorer::new());
        let out = reranker.rerank("A", vec![result(0, "A info.")], 1).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].chunk.text, "A info.");
    }

    #[tokio::test]
    async fn reorders_by_score_and_truncates() {
        let reranker = CrossEncoderReranker::new(ContainsScorer::new());
        let results = vec![result(0, "B info."), result(1, "A info.")];
        let out = reranker.rerank("A", results, 1).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].chunk.text, "A info.");
    }

    #[tokio::test]
    async fn ties_keep_retrieval_order() {
        let reranker = CrossEncoderReranker::new(ContainsScorer::new());
        let results = vec![result(0, "first B"), result(1, "second B"), result(2, "third B")];
        let out = reranker.rerank("A", results, 3).await.unwrap();
        let texts: Vec<&str> = out.iter().map(|r| r.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["first B", "second B", "third B"]);
    }

    /// Always returns a single score regardless of candidate count.
    struct ShortScorer;

    #[async_trait]
    impl PairScorer for ShortScorer {
        async fn score_pairs(&self, _query: &str, _candidates: &[&str]) -> Result<Vec<f32>> {
            Ok(vec![1.0])
        }
    }

    #[tokio::test]
    async fn mismatched_score_count_is_an_error() {
        let reranker = CrossEncoderReranker::new(ShortScorer);
        let results = vec![result(0, "a"), result(1, "b")];
        let err = reranker.rerank("q", results, 2).await.unwrap_err();
        assert!(matches!(err, RagError::Reranker(_)));
    }

    #[tokio::test]
    async fn noop_reranker_truncates_only() {
        let results = vec![result(0, "a"), result(1, "b"), result(2, "c")];
        let out = NoOpReranker.rerank("q", results, 2).await.unwrap();
        let texts: Vec<&str> = out.iter().map(|r| r.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
