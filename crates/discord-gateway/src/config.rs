//! Configuration types for discord-gateway.

use std::env;

use crate::error::GatewayError;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Configuration for connecting to Discord.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Bot token (without the `Bot ` prefix).
    pub token: String,
    /// REST API base URL, including the version segment.
    pub api_url: String,
    /// Users always treated as administrators.
    pub admin_user_ids: Vec<String>,
}

impl GatewayConfig {
    /// Create a new configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            admin_user_ids: Vec::new(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DISCORD_TOKEN` - Bot token
    ///
    /// Optional environment variables:
    /// - `DISCORD_API_URL` - REST API URL (default: https://discord.com/api/v10)
    /// - `DISCORD_ADMIN_USER_IDS` - Comma-separated user ids with admin rights
    pub fn from_env() -> Result<Self, GatewayError> {
        let token = env::var("DISCORD_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| GatewayError::Config("DISCORD_TOKEN not set".to_string()))?;

        let mut config = Self::new(token.trim());

        if let Ok(url) = env::var("DISCORD_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(ids) = env::var("DISCORD_ADMIN_USER_IDS") {
            config.admin_user_ids = parse_id_list(&ids);
        }

        Ok(config)
    }

    /// Override the REST API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the users always treated as administrators.
    pub fn with_admin_users<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_user_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Value of the `Authorization` header.
    pub fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Get the gateway discovery endpoint URL.
    pub fn gateway_bot_url(&self) -> String {
        format!("{}/gateway/bot", self.api_url)
    }

    /// Get the current-user endpoint URL.
    pub fn current_user_url(&self) -> String {
        format!("{}/users/@me", self.api_url)
    }

    /// Get the message-create endpoint URL for a channel.
    pub fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_url, channel_id)
    }

    /// Get the typing-indicator endpoint URL for a channel.
    pub fn typing_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/typing", self.api_url, channel_id)
    }

    /// Get the guild endpoint URL.
    pub fn guild_url(&self, guild_id: &str) -> String {
        format!("{}/guilds/{}", self.api_url, guild_id)
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_url", &self.api_url)
            .field("admin_user_ids", &self.admin_user_ids)
            .finish_non_exhaustive()
    }
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
