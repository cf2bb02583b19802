//! Mock brain implementations for Botty chat handling.
//!
//! This crate provides mock implementations of the `Brain` trait for testing:
//! - `EchoBrain` - Replies with the latest user message
//! - `ScriptedBrain` - Replays queued replies and records every request
//! - `FailingBrain` - Always fails, for fallback paths
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production AI processing, use the `openai-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, CompletionRequest, EchoBrain, HistoryMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoBrain::new();
//!
//!     let request = CompletionRequest::new("gpt-4o", vec![HistoryMessage::user("Hello!")]);
//!
//!     let reply = brain.complete(request).await?;
//!     assert_eq!(reply, "Hello!");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, CompletionRequest, HistoryMessage};

pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
