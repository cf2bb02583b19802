//! Failing brain implementation - every call errors.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, CompletionRequest};

/// A brain whose every call fails with a network error.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    reason: String,
}

impl FailingBrain {
    /// Create a failing brain with the given error text.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new("provider unreachable")
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, BrainError> {
        Err(BrainError::Network(self.reason.clone()))
    }

    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        Err(BrainError::Network(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }
}
