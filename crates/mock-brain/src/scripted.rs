//! Scripted brain implementation - replays queued replies.

use std::collections::VecDeque;

use async_trait::async_trait;
use brain_core::{Brain, BrainError, CompletionRequest};
use tokio::sync::Mutex;

/// A brain that returns pre-queued replies in order and records requests.
///
/// When the queue runs dry it answers with an empty string, which lets
/// tests exercise the empty-reply path.
#[derive(Debug, Default)]
pub struct ScriptedBrain {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBrain {
    /// Create a brain that will answer with `replies`, in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BrainError> {
        self.requests.lock().await.push(request);
        Ok(self.replies.lock().await.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::HistoryMessage;

    #[tokio::test]
    async fn test_replays_in_order_then_empty() {
        let brain = ScriptedBrain::new(["one", "two"]);
        let req = || CompletionRequest::new("m", vec![HistoryMessage::user("q")]);

        assert_eq!(brain.complete(req()).await.unwrap(), "one");
        assert_eq!(brain.complete(req()).await.unwrap(), "two");
        assert_eq!(brain.complete(req()).await.unwrap(), "");
        assert_eq!(brain.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_list_models_unsupported() {
        let brain = ScriptedBrain::default();
        assert!(matches!(
            brain.list_models().await,
            Err(BrainError::Unsupported(_))
        ));
    }
}
