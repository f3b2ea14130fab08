//! # wayfarer-model
//!
//! Generation gateway for the Wayfarer travel assistant.
//!
//! The RAG core assembles a single prompt; this crate carries it across the
//! external-collaborator boundary to a text-completion service and brings
//! the result back in a uniform JSON shape.
//!
//! ## Overview
//!
//! - [`GenerationModel`] - the opaque prompt-in, text-out service trait.
//! - [`GeminiModel`] - Gemini REST client with a bounded request timeout
//!   (behind the default `gemini` feature).
//! - [`MockModel`] - scripted model for tests.
//! - [`GenerationOutcome`] - defensive JSON parse of completion text;
//!   unparsable text is preserved under `raw_text`, never discarded.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wayfarer_model::{GeminiModel, GenerationModel, GenerationRequest, GenerationOutcome};
//!
//! # async fn example() -> Result<(), wayfarer_model::ModelError> {
//! let model = GeminiModel::new("api-key", "gemini-2.5-flash")?;
//! let text = model.generate(GenerationRequest::new("prompt")).await?;
//! let outcome = GenerationOutcome::from_text(text);
//! # Ok(())
//! # }
//! ```

pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod mock;
pub mod model;
pub mod outcome;

pub use error::{ModelError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiModel;
pub use mock::MockModel;
pub use model::{GenerationConfig, GenerationModel, GenerationRequest};
pub use outcome::GenerationOutcome;
