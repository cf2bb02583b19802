//! Discord REST client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{GatewayBot, Guild, SendMessage, SentMessage, User};

/// How long fetched guild data is reused for permission checks.
pub const GUILD_CACHE_TTL: Duration = Duration::from_secs(300);

struct CachedGuild {
    guild: Guild,
    fetched_at: Instant,
}

/// Client for the Discord REST API.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    config: GatewayConfig,
    bot_user: Arc<OnceLock<User>>,
    guilds: Arc<Mutex<HashMap<String, CachedGuild>>>,
    connected: Arc<AtomicBool>,
}

impl DiscordClient {
    /// Create a client without contacting Discord.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if config.token.trim().is_empty() {
            return Err(GatewayError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self {
            http,
            config,
            bot_user: Arc::new(OnceLock::new()),
            guilds: Arc::new(Mutex::new(HashMap::new())),
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a client and verify the token by fetching the bot user.
    pub async fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Self::new(config)?;
        let user = client.current_user().await?;
        info!("Connected to Discord as {} (ID: {})", user.username, user.id);
        client.connected.store(true, Ordering::SeqCst);
        Ok(client)
    }

    /// Check if the last request to Discord succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The bot's own user id, once known.
    pub fn bot_user_id(&self) -> Option<&str> {
        self.bot_user.get().map(|u| u.id.as_str())
    }

    /// Record the bot user reported by the gateway.
    pub(crate) fn set_bot_user(&self, user: User) {
        let _ = self.bot_user.set(user);
    }

    /// Fetch the bot's own user.
    pub async fn current_user(&self) -> Result<User, GatewayError> {
        let user: User = self.get_json(&self.config.current_user_url()).await?;
        self.set_bot_user(user.clone());
        Ok(user)
    }

    /// Websocket URL to open a gateway session on.
    pub async fn gateway_url(&self) -> Result<String, GatewayError> {
        let bot: GatewayBot = self.get_json(&self.config.gateway_bot_url()).await?;
        Ok(format!("{}/?v=10&encoding=json", bot.url.trim_end_matches('/')))
    }

    /// Post a text message to a channel.
    ///
    /// Content longer than the platform limit is truncated.
    pub async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<SentMessage, GatewayError> {
        let body = SendMessage::new(content);
        if body.content.len() < content.len() {
            warn!(channel_id, "Message truncated to {} bytes", body.content.len());
        }

        debug!(channel_id, "Sending message ({} chars)", body.content.chars().count());

        let response = self
            .http
            .post(self.config.messages_url(channel_id))
            .header("Authorization", self.config.auth_header())
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Show the typing indicator in a channel for a few seconds.
    pub async fn trigger_typing(&self, channel_id: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.config.typing_url(channel_id))
            .header("Authorization", self.config.auth_header())
            .header("Content-Length", "0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }

    /// Fetch a guild, reusing a recent copy when available.
    pub async fn guild(&self, guild_id: &str) -> Result<Guild, GatewayError> {
        {
            let cache = self.guilds.lock().await;
            if let Some(cached) = cache.get(guild_id) {
                if cached.fetched_at.elapsed() < GUILD_CACHE_TTL {
                    return Ok(cached.guild.clone());
                }
            }
        }

        debug!(guild_id, "Fetching guild roles");
        let guild: Guild = self.get_json(&self.config.guild_url(guild_id)).await?;

        self.guilds.lock().await.insert(
            guild_id.to_string(),
            CachedGuild {
                guild: guild.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(guild)
    }

    /// Whether a user has administrator rights where they posted.
    ///
    /// Configured admin users always do. Outside a guild nobody else does.
    /// Inside a guild the owner and holders of an administrator role do.
    pub async fn is_administrator(
        &self,
        guild_id: Option<&str>,
        user_id: &str,
        member_roles: &[String],
    ) -> Result<bool, GatewayError> {
        if self.config.admin_user_ids.iter().any(|id| id == user_id) {
            return Ok(true);
        }

        let Some(guild_id) = guild_id else {
            return Ok(false);
        };

        let guild = self.guild(guild_id).await?;
        Ok(guild.grants_administrator(user_id, member_roles))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(url)
            .header("Authorization", self.config.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("config", &self.config)
            .field("bot_user_id", &self.bot_user_id())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DiscordClient {
        let config = GatewayConfig::new("tok").with_api_url(server.uri());
        DiscordClient::new(config).unwrap()
    }

    async fn mount_guild(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/guilds/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "g1",
                "owner_id": "owner",
                "roles": [
                    {"id": "g1", "permissions": "1024"},
                    {"id": "admins", "permissions": "8"}
                ]
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            DiscordClient::new(GatewayConfig::new(" ")),
            Err(GatewayError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_records_bot_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .and(header("Authorization", "Bot tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "999", "username": "botty", "bot": true
            })))
            .mount(&server)
            .await;

        let config = GatewayConfig::new("tok").with_api_url(server.uri());
        let client = DiscordClient::connect(config).await.unwrap();
        assert_eq!(client.bot_user_id(), Some("999"));
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(ResponseTemplate::new(401).set_body_string("401: Unauthorized"))
            .mount(&server)
            .await;

        let config = GatewayConfig::new("bad").with_api_url(server.uri());
        match DiscordClient::connect(config).await {
            Err(GatewayError::Api { status, .. }) => assert_eq!(status, 401),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_message_posts_truncated_content() {
        let server = MockServer::start().await;
        let expected = "a".repeat(2000);
        Mock::given(method("POST"))
            .and(path("/channels/42/messages"))
            .and(header("Authorization", "Bot tok"))
            .and(body_json(json!({"content": expected})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1", "channel_id": "42"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sent = client_for(&server)
            .send_message("42", &"a".repeat(2500))
            .await
            .unwrap();
        assert_eq!(sent.channel_id, "42");
    }

    #[tokio::test]
    async fn test_send_message_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels/42/messages"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Missing Access"))
            .mount(&server)
            .await;

        let err = client_for(&server).send_message("42", "hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_trigger_typing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels/42/typing"))
            .and(header("Authorization", "Bot tok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).trigger_typing("42").await.unwrap();
    }

    #[tokio::test]
    async fn test_gateway_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/bot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "wss://gateway.discord.gg", "shards": 1
            })))
            .mount(&server)
            .await;

        let url = client_for(&server).gateway_url().await.unwrap();
        assert_eq!(url, "wss://gateway.discord.gg/?v=10&encoding=json");
    }

    #[tokio::test]
    async fn test_administrator_resolution_uses_cache() {
        let server = MockServer::start().await;
        mount_guild(&server).await;
        let client = client_for(&server);

        assert!(client.is_administrator(Some("g1"), "owner", &[]).await.unwrap());
        assert!(client
            .is_administrator(Some("g1"), "u", &["admins".to_string()])
            .await
            .unwrap());
        assert!(!client.is_administrator(Some("g1"), "u", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_configured_admin_skips_lookup() {
        let server = MockServer::start().await;
        let config = GatewayConfig::new("tok")
            .with_api_url(server.uri())
            .with_admin_users(["7"]);
        let client = DiscordClient::new(config).unwrap();

        assert!(client.is_administrator(None, "7", &[]).await.unwrap());
        assert!(client.is_administrator(Some("g1"), "7", &[]).await.unwrap());
        assert!(!client.is_administrator(None, "8", &[]).await.unwrap());
    }
}
