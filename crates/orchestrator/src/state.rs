//! The state guarded by the orchestrator's lock.

use brain_core::ConversationHistory;
use json_store::JsonStore;
use scheduler::{JokeSubscriptions, Schedule};
use tracing::info;

use crate::config::{BotConfig, OrchestratorConfig};

/// Document holding [`BotConfig`].
pub const BOT_CONFIG_FILE: &str = "bot_config.json";

/// Document holding the daily joke subscriptions.
pub const DAILYJOKE_FILE: &str = "dailyjoke_channels.json";

/// Document holding the scheduled messages.
pub const SCHEDULE_FILE: &str = "scheduled_messages.json";

/// Everything chat turns, commands and ticks mutate.
#[derive(Debug)]
pub struct BotState {
    pub history: ConversationHistory,
    pub config: BotConfig,
    pub schedule: Schedule,
    pub jokes: JokeSubscriptions,
}

impl BotState {
    /// Fresh state with empty histories and default documents.
    pub fn new(config: &OrchestratorConfig) -> Self {
        Self {
            history: ConversationHistory::new(config.directive.clone(), config.max_history),
            config: BotConfig::default(),
            schedule: Schedule::new(),
            jokes: JokeSubscriptions::new(),
        }
    }

    /// Load the persisted documents. Missing or unreadable ones start
    /// from defaults.
    pub async fn load(store: &JsonStore, config: &OrchestratorConfig) -> Self {
        let state = Self {
            config: store.load_or_default(BOT_CONFIG_FILE).await,
            schedule: store.load_or_default(SCHEDULE_FILE).await,
            jokes: store.load_or_default(DAILYJOKE_FILE).await,
            ..Self::new(config)
        };

        info!(
            "Loaded state: model={}, autoreply={}, {} scheduled, {} joke subscriptions",
            state.config.active_model,
            state.config.autoreply_enabled,
            state.schedule.len(),
            state.jokes.len()
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_documents_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let state = BotState::load(&store, &OrchestratorConfig::default()).await;
        assert_eq!(state.config, BotConfig::default());
        assert!(state.schedule.is_empty());
        assert!(state.jokes.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_document_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BOT_CONFIG_FILE), "[oops").unwrap();
        std::fs::write(
            dir.path().join(DAILYJOKE_FILE),
            r#"{"5": {"channel_id": "5", "enabled": true}}"#,
        )
        .unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let state = BotState::load(&store, &OrchestratorConfig::default()).await;
        assert_eq!(state.config, BotConfig::default());
        assert!(state.jokes.get("5").unwrap().enabled);
    }
}
