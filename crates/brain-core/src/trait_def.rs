//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::CompletionRequest;

/// A generative-AI backend.
///
/// Brains are stateless with respect to conversations: the caller owns the
/// history and hands over the full, directive-prefixed window on every call.
/// This trait is object-safe and can be used with `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Complete a conversation and return the assistant's reply text.
    ///
    /// The returned text may be empty; callers decide how to handle that.
    async fn complete(&self, request: CompletionRequest) -> Result<String, BrainError>;

    /// List the model identifiers the provider offers.
    ///
    /// Default implementation reports the operation as unsupported.
    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        Err(BrainError::Unsupported("list_models"))
    }

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Gracefully shut down the brain.
    ///
    /// Default implementation does nothing.
    async fn shutdown(&self) -> Result<(), BrainError> {
        Ok(())
    }
}
