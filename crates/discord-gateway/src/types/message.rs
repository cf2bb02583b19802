//! Message and user types.

use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the first second of 2015.
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Maximum length of a message body, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// A Discord user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User snowflake id.
    pub id: String,

    /// Account name.
    #[serde(default)]
    pub username: String,

    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

/// Guild-specific data about a message author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    /// Role ids held by the member.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A `MESSAGE_CREATE` dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    /// Message snowflake id.
    pub id: String,

    /// Channel the message was posted in.
    pub channel_id: String,

    /// Guild the channel belongs to; absent for direct messages.
    #[serde(default)]
    pub guild_id: Option<String>,

    /// Message author.
    pub author: User,

    /// Author's guild membership; absent for direct messages.
    #[serde(default)]
    pub member: Option<Member>,

    /// Text content.
    #[serde(default)]
    pub content: String,

    /// Users mentioned in the message.
    #[serde(default)]
    pub mentions: Vec<User>,
}

impl MessageCreate {
    /// Check whether `user_id` is mentioned.
    pub fn mentions_user(&self, user_id: &str) -> bool {
        self.mentions.iter().any(|u| u.id == user_id)
    }

    /// Role ids of the author in the guild, empty outside guilds.
    pub fn member_roles(&self) -> &[String] {
        self.member.as_ref().map(|m| m.roles.as_slice()).unwrap_or(&[])
    }

    /// Creation time in Unix milliseconds, decoded from the snowflake id.
    pub fn created_at_millis(&self) -> u64 {
        self.id
            .parse::<u64>()
            .map(|id| (id >> 22) + DISCORD_EPOCH_MS)
            .unwrap_or(0)
    }
}

/// Body of a message-create request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub content: String,
}

impl SendMessage {
    /// Build a request, truncating content to the platform limit.
    pub fn new(content: &str) -> Self {
        let content = match content.char_indices().nth(MAX_CONTENT_CHARS) {
            Some((cut, _)) => content[..cut].to_string(),
            None => content.to_string(),
        };
        Self { content }
    }
}

/// Response of a message-create request.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
}
