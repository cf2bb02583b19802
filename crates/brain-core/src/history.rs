//! Conversation history management.
//!
//! Each channel owns a bounded, ordered window of role-tagged messages whose
//! first slot is always the directive (the fixed system message). Once the
//! window is full, the oldest non-directive message is dropped.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default number of chat messages kept per channel, not counting the directive.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Author role of a history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

impl HistoryMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-channel conversation windows, always prefixed by the directive.
///
/// The window capacity is `max_history + 1`: slot 0 holds the directive and is
/// never evicted. Channels are created lazily on first access.
///
/// This type does no locking of its own; the owner serializes access.
///
/// # Example
///
/// ```rust
/// use brain_core::{ConversationHistory, HistoryMessage};
///
/// let mut history = ConversationHistory::new("You are Botty.", 2);
///
/// history.append("chan", HistoryMessage::user("one"));
/// history.append("chan", HistoryMessage::assistant("two"));
/// history.append("chan", HistoryMessage::user("three"));
///
/// let window = history.get("chan");
/// assert_eq!(window.len(), 3);
/// assert_eq!(window[0].content, "You are Botty.");
/// assert_eq!(window[1].content, "two");
/// ```
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    windows: IndexMap<String, VecDeque<HistoryMessage>>,
    directive: HistoryMessage,
    max_history: usize,
}

impl ConversationHistory {
    /// Create an empty history with the given directive and per-channel limit.
    pub fn new(directive: impl Into<String>, max_history: usize) -> Self {
        Self {
            windows: IndexMap::new(),
            directive: HistoryMessage::system(directive),
            max_history,
        }
    }

    /// The directive every window starts with.
    pub fn directive(&self) -> &HistoryMessage {
        &self.directive
    }

    /// Replace the directive.
    ///
    /// Existing windows are reset lazily on their next access.
    pub fn set_directive(&mut self, directive: impl Into<String>) {
        self.directive = HistoryMessage::system(directive);
    }

    /// Maximum window length, directive included.
    pub fn capacity(&self) -> usize {
        self.max_history.saturating_add(1)
    }

    /// Number of channels with an initialized window.
    pub fn channel_count(&self) -> usize {
        self.windows.len()
    }

    /// Get-or-create the window for a channel.
    ///
    /// A window that is empty, or whose slot 0 no longer matches the current
    /// directive, is reset to contain only the directive.
    pub fn window(&mut self, channel_id: &str) -> &VecDeque<HistoryMessage> {
        self.window_mut(channel_id)
    }

    /// Get an owned snapshot of the channel's window.
    pub fn get(&mut self, channel_id: &str) -> Vec<HistoryMessage> {
        self.window_mut(channel_id).iter().cloned().collect()
    }

    /// Append a message, evicting the oldest non-directive message when full.
    pub fn append(&mut self, channel_id: &str, message: HistoryMessage) {
        let capacity = self.capacity();
        let window = self.window_mut(channel_id);
        window.push_back(message);
        while window.len() > capacity.max(1) {
            window.remove(1);
        }
    }

    /// Reset a channel's window to the directive alone.
    pub fn clear(&mut self, channel_id: &str) {
        let directive = self.directive.clone();
        let window = self.windows.entry(channel_id.to_string()).or_default();
        window.clear();
        window.push_back(directive);
    }

    fn window_mut(&mut self, channel_id: &str) -> &mut VecDeque<HistoryMessage> {
        let directive = &self.directive;
        let window = self.windows.entry(channel_id.to_string()).or_default();
        if window.front() != Some(directive) {
            window.clear();
            window.push_back(directive.clone());
        }
        window
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_MAX_HISTORY)
    }
}
