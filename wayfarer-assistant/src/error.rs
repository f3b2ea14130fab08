//! Error types for the `wayfarer-assistant` crate.

use thiserror::Error;

/// Errors that can occur in the assistant service layer.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The persona configuration is missing or malformed. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration key is absent or empty.
    #[error("missing required configuration key: {0}")]
    MissingKey(&'static str),

    /// The persona configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// An error propagated from the RAG pipeline.
    #[error(transparent)]
    Rag(#[from] wayfarer_rag::RagError),

    /// An error propagated from the generation gateway.
    #[error(transparent)]
    Model(#[from] wayfarer_model::ModelError),
}

impl From<serde_yaml::Error> for AssistantError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(format!("invalid YAML: {e}"))
    }
}

/// A convenience result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
