//! End-to-end assistant tests: corpus ingestion, retrieval, prompt
//! assembly, and defensive parsing of model replies, with a scripted
//! mock in place of a real generation backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wayfarer_assistant::{AssistantConfig, TravelAssistant};
use wayfarer_model::{GenerationOutcome, MockModel};
use wayfarer_rag::{
    CrossEncoderReranker, EmbeddingProvider, InMemoryVectorStore, PairScorer, ParagraphChunker,
    RagConfig, RagPipeline, Result as RagResult,
};

const DIM: usize = 26;

/// Deterministic letter-histogram embedder, L2-normalized.
struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let mut v = vec![0.0f32; DIM];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            v[idx] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Scores a candidate by how many query words it contains.
struct WordOverlapScorer;

#[async_trait]
impl PairScorer for WordOverlapScorer {
    async fn score_pairs(&self, query: &str, candidates: &[&str]) -> RagResult<Vec<f32>> {
        Ok(candidates
            .iter()
            .map(|c| query.split_whitespace().filter(|w| c.contains(w)).count() as f32)
            .collect())
    }
}

const CONFIG_YAML: &str = r#"
system_prompt: You are a helpful travel planner.
response_style:
  schema:
    type: object
    properties:
      summary:
        type: string
"#;

fn assistant(model: Arc<MockModel>) -> TravelAssistant {
    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(LetterEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .chunker(Arc::new(ParagraphChunker::new()))
        .reranker(Arc::new(CrossEncoderReranker::new(WordOverlapScorer)))
        .build()
        .unwrap();

    TravelAssistant::builder()
        .pipeline(Arc::new(pipeline))
        .model(model)
        .config(AssistantConfig::from_yaml_str(CONFIG_YAML).unwrap())
        .collection("travel")
        .build()
        .unwrap()
}

#[tokio::test]
async fn answers_with_parsed_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.\n\nPorto info.").unwrap();

    let model = Arc::new(MockModel::new().with_response(r#"{"summary": "Visit Alfama."}"#));
    let assistant = assistant(Arc::clone(&model));
    assistant.ingest_corpus(dir.path()).await.unwrap();

    let answer = assistant.answer("Lisbon").await.unwrap();
    assert!(answer.outcome.is_parsed());
    assert_eq!(answer.outcome.into_value(), json!({"summary": "Visit Alfama."}));
}

#[tokio::test]
async fn non_json_reply_is_wrapped_as_raw_text() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.").unwrap();

    let model = Arc::new(MockModel::new().with_response("hello"));
    let assistant = assistant(Arc::clone(&model));
    assistant.ingest_corpus(dir.path()).await.unwrap();

    let answer = assistant.answer("Lisbon").await.unwrap();
    assert!(matches!(&answer.outcome, GenerationOutcome::Unparsed(_)));
    assert_eq!(answer.outcome.into_value(), json!({"raw_text": "hello"}));
}

#[tokio::test]
async fn prompt_carries_persona_query_and_chunks() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.\n\nPorto info.").unwrap();

    let model = Arc::new(MockModel::new().with_response("{}"));
    let assistant = assistant(Arc::clone(&model));
    assistant.ingest_corpus(dir.path()).await.unwrap();

    let answer = assistant.answer("Lisbon").await.unwrap();
    // Word-overlap reranking puts the chunk containing the query word first.
    assert_eq!(answer.chunks[0], "Lisbon info.");

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].prompt;
    assert!(prompt.starts_with("You are a helpful travel planner."));
    assert!(prompt.contains("User Question: Lisbon"));
    assert!(prompt.contains("Lisbon info."));
}

#[tokio::test]
async fn request_config_asks_for_json_with_the_configured_schema() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.").unwrap();

    let model = Arc::new(MockModel::new().with_response("{}"));
    let assistant = assistant(Arc::clone(&model));
    assistant.ingest_corpus(dir.path()).await.unwrap();
    assistant.answer("Lisbon").await.unwrap();

    let requests = model.requests();
    let config = &requests[0].config;
    assert!(config.json_output);
    let schema = config.response_schema.as_ref().unwrap();
    assert_eq!(schema["type"], "object");
}

#[tokio::test]
async fn empty_corpus_still_produces_an_answer() {
    let dir = tempfile::tempdir().unwrap();

    let model = Arc::new(MockModel::new().with_response("{}"));
    let assistant = assistant(Arc::clone(&model));
    assistant.ingest_corpus(dir.path()).await.unwrap();

    let answer = assistant.answer("Lisbon").await.unwrap();
    assert!(answer.chunks.is_empty());

    // The fallback clause is always present so the model can decline safely.
    let requests = model.requests();
    assert!(requests[0].prompt.contains("Do not fabricate information."));
}

#[tokio::test]
async fn reingest_replaces_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.\n\nPorto info.").unwrap();

    let model = Arc::new(MockModel::new().with_response("{}").with_response("{}"));
    let assistant = assistant(Arc::clone(&model));
    assert_eq!(assistant.ingest_corpus(dir.path()).await.unwrap(), 2);

    std::fs::write(dir.path().join("lisbon.txt"), "Lisbon info.").unwrap();
    assert_eq!(assistant.reingest_corpus(dir.path()).await.unwrap(), 1);

    let answer = assistant.answer("Lisbon").await.unwrap();
    assert_eq!(answer.chunks, vec!["Lisbon info.".to_string()]);
}
