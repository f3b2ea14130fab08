//! Local ONNX Runtime models for embedding and cross-encoder scoring.
//!
//! Only available with the `onnx` feature. Two model wrappers live here:
//!
//! - [`OnnxEmbeddingProvider`] - a sentence-embedding model (mean pooling
//!   over the attention mask, L2 normalization), implementing
//!   [`EmbeddingProvider`].
//! - [`OnnxCrossEncoder`] - a sequence-classification relevance model that
//!   jointly encodes (query, candidate) pairs, implementing [`PairScorer`].
//!
//! Both load an exported `model.onnx` plus its `tokenizer.json` once at
//! construction; a load failure is fatal (there is no fallback inference
//! path). The session sits behind a `Mutex` because `Session::run` takes
//! `&mut self`; the model weights themselves are never mutated.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Ix3;
use ort::session::{Session, builder::GraphOptimizationLevel};
use tokenizers::Tokenizer;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::reranker::PairScorer;

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: "onnx".to_string(), message: message.into() }
}

fn load_session(model_path: &Path) -> std::result::Result<Session, ort::Error> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(available_threads())?
        .commit_from_file(model_path)
}

fn load_tokenizer(path: &Path) -> std::result::Result<Tokenizer, String> {
    Tokenizer::from_file(path).map_err(|e| format!("failed to load tokenizer {}: {e}", path.display()))
}

fn available_threads() -> usize {
    std::thread::available_parallelism().map(std::num::NonZero::get).unwrap_or(4)
}

/// L2 normalize a vector in place.
fn l2_normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}

/// Mean pooling over the token axis, weighted by the attention mask.
fn mean_pool(hidden: &ndarray::ArrayView3<f32>, attention_mask: &[u32]) -> Vec<f32> {
    let hidden_dim = hidden.shape()[2];
    let valid: f32 = attention_mask.iter().map(|&m| m as f32).sum();
    if valid == 0.0 {
        return vec![0.0; hidden_dim];
    }

    let mut pooled = vec![0.0; hidden_dim];
    for (seq_idx, &mask) in attention_mask.iter().enumerate() {
        if mask != 0 {
            for (d, value) in pooled.iter_mut().enumerate() {
                *value += hidden[[0, seq_idx, d]];
            }
        }
    }
    for value in &mut pooled {
        *value /= valid;
    }
    pooled
}

/// Tokenized model inputs for a batch of one.
struct EncodedInput {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
    mask_u32: Vec<u32>,
}

impl EncodedInput {
    fn from_encoding(encoding: &tokenizers::Encoding) -> Self {
        Self {
            input_ids: encoding.get_ids().iter().map(|&id| i64::from(id)).collect(),
            attention_mask: encoding.get_attention_mask().iter().map(|&m| i64::from(m)).collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&t| i64::from(t)).collect(),
            mask_u32: encoding.get_attention_mask().to_vec(),
        }
    }

    /// Run the session on this input and return the named outputs extracted
    /// into an owned f32 array.
    fn run(
        &self,
        session: &Mutex<Session>,
        wants_token_type_ids: bool,
        output_names: &[&str],
    ) -> std::result::Result<ndarray::ArrayD<f32>, String> {
        let seq_len = self.input_ids.len();
        let ids = ort::value::Tensor::from_array((
            [1, seq_len],
            self.input_ids.clone().into_boxed_slice(),
        ))
        .map_err(|e| e.to_string())?;
        let mask = ort::value::Tensor::from_array((
            [1, seq_len],
            self.attention_mask.clone().into_boxed_slice(),
        ))
        .map_err(|e| e.to_string())?;

        let mut session = session.lock().map_err(|_| "session lock poisoned".to_string())?;
        let outputs = if wants_token_type_ids {
            let types = ort::value::Tensor::from_array((
                [1, seq_len],
                self.token_type_ids.clone().into_boxed_slice(),
            ))
            .map_err(|e| e.to_string())?;
            session
                .run(ort::inputs![
                    "input_ids" => ids,
                    "attention_mask" => mask,
                    "token_type_ids" => types,
                ])
                .map_err(|e| e.to_string())?
        } else {
            session
                .run(ort::inputs![
                    "input_ids" => ids,
                    "attention_mask" => mask,
                ])
                .map_err(|e| e.to_string())?
        };

        let value = output_names
            .iter()
            .find_map(|name| outputs.get(*name))
            .ok_or_else(|| format!("model produced none of the expected outputs {output_names:?}"))?;

        let view = value.try_extract_array::<f32>().map_err(|e| e.to_string())?;
        Ok(view.to_owned())
    }
}

fn session_wants_token_type_ids(session: &Session) -> bool {
    session.inputs().iter().any(|input| input.name() == "token_type_ids")
}

/// A local sentence-embedding model running under ONNX Runtime.
///
/// Implements [`EmbeddingProvider`] with mean pooling and L2 normalization,
/// so every produced vector has unit length. Batch embedding runs the texts
/// sequentially through the same session, which keeps batch and single
/// results numerically identical.
pub struct OnnxEmbeddingProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    wants_token_type_ids: bool,
    dimensions: usize,
}

impl std::fmt::Debug for OnnxEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingProvider")
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingProvider {
    /// Load the embedding model and tokenizer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if either file cannot be loaded or
    /// the model's output dimensionality cannot be determined. Callers
    /// should treat this as fatal.
    pub fn load(model_path: impl AsRef<Path>, tokenizer_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let session = load_session(model_path)
            .map_err(|e| embedding_error(format!("failed to load {}: {e}", model_path.display())))?;
        let tokenizer = load_tokenizer(tokenizer_path.as_ref()).map_err(embedding_error)?;

        let dimensions = detect_hidden_dimension(&session)
            .ok_or_else(|| embedding_error("could not determine embedding dimension"))?;
        let wants_token_type_ids = session_wants_token_type_ids(&session);

        Ok(Self { session: Mutex::new(session), tokenizer, wants_token_type_ids, dimensions })
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| embedding_error(format!("tokenization failed: {e}")))?;
        let input = EncodedInput::from_encoding(&encoding);

        let hidden = input
            .run(
                &self.session,
                self.wants_token_type_ids,
                &["last_hidden_state", "hidden_states", "output"],
            )
            .map_err(embedding_error)?;

        let hidden = hidden
            .into_dimensionality::<Ix3>()
            .map_err(|e| embedding_error(format!("unexpected output shape: {e}")))?;

        let mut embedding = mean_pool(&hidden.view(), &input.mask_u32);
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(text)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A local cross-encoder relevance model running under ONNX Runtime.
///
/// Jointly tokenizes each (query, candidate) sentence pair and reads the
/// relevance logit from the classification head (the last logit for
/// two-class heads, the only logit for regression heads).
pub struct OnnxCrossEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    wants_token_type_ids: bool,
}

impl std::fmt::Debug for OnnxCrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxCrossEncoder").finish_non_exhaustive()
    }
}

impl OnnxCrossEncoder {
    /// Load the cross-encoder model and tokenizer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Reranker`] if either file cannot be loaded.
    /// Callers should treat this as fatal.
    pub fn load(model_path: impl AsRef<Path>, tokenizer_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let session = load_session(model_path).map_err(|e| {
            RagError::Reranker(format!("failed to load {}: {e}", model_path.display()))
        })?;
        let tokenizer = load_tokenizer(tokenizer_path.as_ref()).map_err(RagError::Reranker)?;
        let wants_token_type_ids = session_wants_token_type_ids(&session);

        Ok(Self { session: Mutex::new(session), tokenizer, wants_token_type_ids })
    }

    fn score_one(&self, query: &str, candidate: &str) -> Result<f32> {
        let encoding = self
            .tokenizer
            .encode((query, candidate), true)
            .map_err(|e| RagError::Reranker(format!("tokenization failed: {e}")))?;
        let input = EncodedInput::from_encoding(&encoding);

        let logits = input
            .run(&self.session, self.wants_token_type_ids, &["logits", "output"])
            .map_err(RagError::Reranker)?;

        logits
            .iter()
            .copied()
            .last()
            .ok_or_else(|| RagError::Reranker("model produced empty logits".to_string()))
    }
}

#[async_trait]
impl PairScorer for OnnxCrossEncoder {
    async fn score_pairs(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        candidates.iter().map(|candidate| self.score_one(query, candidate)).collect()
    }
}

/// Read the hidden dimension from the model's output tensor metadata.
fn detect_hidden_dimension(session: &Session) -> Option<usize> {
    for output in session.outputs() {
        if let ort::value::ValueType::Tensor { shape, .. } = output.dtype() {
            // Expect [batch, seq_len, hidden_dim]; the last axis is the
            // embedding width.
            if shape.len() >= 2 {
                if let Some(&dim) = shape.last() {
                    if dim > 0 {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        return Some(dim as usize);
                    }
                }
            }
        }
    }
    None
}
