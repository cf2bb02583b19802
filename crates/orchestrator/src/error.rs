//! Error types for orchestrator operations.

use json_store::StoreError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Message was intentionally skipped.
    #[error("message skipped: {0}")]
    Skipped(String),

    /// The author lacks the administrator capability.
    #[error("permission denied for '{0}'")]
    PermissionDenied(String),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Loading or saving state failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
