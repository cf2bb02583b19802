//! Message types exchanged between the platform, the orchestrator and brains.

use serde::{Deserialize, Serialize};

use crate::history::{HistoryMessage, Role};

/// An inbound chat message from the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform user ID of the author.
    pub author_id: String,
    /// Channel the message was posted in. Replies go here.
    pub channel_id: String,
    /// Guild (server) ID, `None` for direct messages.
    pub guild_id: Option<String>,
    /// Trimmed message text.
    pub text: String,
    /// Message timestamp (milliseconds since epoch).
    pub timestamp: u64,
    /// Whether the author holds the administrator capability.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the message explicitly mentions the bot.
    #[serde(default)]
    pub mentions_bot: bool,
}

impl InboundMessage {
    /// Create a direct (non-guild) message.
    pub fn direct(
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            channel_id: channel_id.into(),
            guild_id: None,
            text: text.into(),
            timestamp,
            is_admin: false,
            mentions_bot: false,
        }
    }

    /// Create a message posted in a guild channel.
    pub fn guild(
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        guild_id: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            guild_id: Some(guild_id.into()),
            ..Self::direct(author_id, channel_id, text, timestamp)
        }
    }

    /// Mark the author as an administrator.
    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Mark the message as mentioning the bot.
    pub fn mentioning_bot(mut self) -> Self {
        self.mentions_bot = true;
        self
    }
}

/// An outbound message to post in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Destination channel.
    pub channel_id: String,
    /// Message content.
    pub text: String,
}

impl OutboundMessage {
    /// Create a message for an arbitrary channel.
    pub fn to_channel(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }

    /// Create a reply in the channel an inbound message came from.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::to_channel(message.channel_id.clone(), text)
    }
}

/// A request for a brain to continue a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier to use for this call.
    pub model: String,
    /// Ordered conversation, directive first.
    pub messages: Vec<HistoryMessage>,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(model: impl Into<String>, messages: Vec<HistoryMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Text of the most recent user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}
