//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur while talking to an AI backend.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the provider or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered, but not with something usable.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The operation is not offered by this brain.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
