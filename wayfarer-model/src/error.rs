//! Error types for the `wayfarer-model` crate.

use thiserror::Error;

/// Errors that can occur at the generation gateway.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A configuration problem (missing API key, invalid model name).
    /// Fatal at startup or first use; never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// The generation request failed (network, auth, quota, non-success
    /// status). Propagated to the caller as a request-level failure.
    #[error("generation request failed ({provider}): {message}")]
    Api {
        /// The gateway provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The gateway returned a response the client could not interpret as a
    /// completion (no candidates, unexpected body shape). Distinct from
    /// non-JSON completion text, which is handled by
    /// [`GenerationOutcome`](crate::GenerationOutcome), not an error.
    #[error("invalid gateway response ({provider}): {message}")]
    InvalidResponse {
        /// The gateway provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for gateway operations.
pub type Result<T> = std::result::Result<T, ModelError>;
