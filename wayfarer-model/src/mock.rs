//! Mock generation model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::model::{GenerationModel, GenerationRequest};

/// A scripted [`GenerationModel`] that replays canned responses and records
/// the requests it receives.
///
/// # Example
///
/// ```rust,ignore
/// use wayfarer_model::MockModel;
///
/// let model = MockModel::new().with_response("hello");
/// let text = model.generate(GenerationRequest::new("prompt")).await?;
/// assert_eq!(text, "hello");
/// ```
#[derive(Debug, Default)]
pub struct MockModel {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockModel {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response (consumed in FIFO order).
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push_response(text);
        self
    }

    /// Queue a canned response on an existing mock.
    pub fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().expect("mock lock poisoned").push_back(text.into());
    }

    /// The requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl GenerationModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().expect("mock lock poisoned").push(request);
        self.responses.lock().expect("mock lock poisoned").pop_front().ok_or_else(|| {
            ModelError::Api {
                provider: "mock".to_string(),
                message: "no scripted response left".to_string(),
            }
        })
    }
}
