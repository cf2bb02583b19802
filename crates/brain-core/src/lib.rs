//! Core trait and types for Botty brain implementations.
//!
//! This crate provides the shared interface between the chat gateway and
//! the generative-AI backends. It defines:
//!
//! - [`Brain`] - The trait every AI backend implements
//! - [`CompletionRequest`] - A model name plus the ordered conversation to complete
//! - [`InboundMessage`] / [`OutboundMessage`] - Platform-neutral chat messages
//! - [`ConversationHistory`] - Bounded per-channel conversation windows
//! - [`BrainError`] - Error types for brain operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, CompletionRequest};
//! use async_trait::async_trait;
//!
//! struct ParrotBrain;
//!
//! #[async_trait]
//! impl Brain for ParrotBrain {
//!     async fn complete(&self, request: CompletionRequest) -> Result<String, BrainError> {
//!         Ok(request.last_user_text().unwrap_or_default().to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "ParrotBrain"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use history::{ConversationHistory, HistoryMessage, Role, DEFAULT_MAX_HISTORY};
pub use message::{CompletionRequest, InboundMessage, OutboundMessage};
pub use prompt::{hash_prompt, prompt_fingerprint};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
