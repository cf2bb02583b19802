//! Main orchestrator that coordinates message processing and ticks.

use std::sync::Mutex as StdMutex;

use brain_core::{Brain, CompletionRequest, HistoryMessage, InboundMessage, OutboundMessage};
use chrono::{DateTime, Utc};
use json_store::{EventLog, JsonStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scheduler::{
    next_occurrence, random_joke, JokeSubscriptions, Recurrence, Schedule, ScheduledItem,
};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::commands::{AdminCommand, Command, ScheduleRequest, Toggle, ADMIN_USAGE};
use crate::config::{BotConfig, OrchestratorConfig};
use crate::error::OrchestratorError;
use crate::sender::MessageSender;
use crate::state::{BotState, BOT_CONFIG_FILE, DAILYJOKE_FILE, SCHEDULE_FILE};

/// Sent when the AI returns an empty reply. Kept in history.
pub const EMPTY_REPLY_TEXT: &str = "Hmm, I seem to have lost my train of thought. Try again?";

/// Sent when the AI call fails. Not kept in history.
pub const AI_ERROR_TEXT: &str =
    "Sorry, I couldn't reach my brain (AI provider error). Try again later!";

/// Sent when a non-administrator uses an admin command.
pub const PERMISSION_DENIED_TEXT: &str =
    "Sorry, only server administrators can use that command.";

/// Most model ids listed by `admin listmodels`.
pub const MAX_LISTED_MODELS: usize = 50;

/// Help text for the given command prefix.
pub fn help_text(prefix: &str) -> String {
    format!(
        "I'm Botty. Talk to me and I'll answer (with a side of sarcasm).\n\n\
         Commands:\n\
         • {p}help - Show this message\n\
         • {p}dailyjoke on|off - Daily joke in this channel\n\
         • {p}schedule HH:MM <message> [daily] - Post a message at a UTC time\n\n\
         Admin commands:\n\
         • {p}admin clearhistory - Forget this channel's conversation\n\
         • {p}admin setmodel <model> - Switch the AI model\n\
         • {p}admin listmodels - List available models\n\
         • {p}admin autoreply on|off - Reply to every message, or only to mentions",
        p = prefix
    )
}

/// What a tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Another tick was running, so this one did nothing.
    pub skipped: bool,
    /// Scheduled items handed to the sender.
    pub scheduled_sent: usize,
    /// Jokes handed to the sender.
    pub jokes_sent: usize,
    /// Sends that failed.
    pub failures: usize,
}

/// Main orchestrator that coordinates message processing.
///
/// The orchestrator:
/// - Dispatches prefix commands, enforcing the admin gate
/// - Runs chat turns against the brain with a bounded per-channel window
/// - Reconciles scheduled messages and daily jokes on every tick
/// - Persists every state change to the store
///
/// All mutable state lives behind one lock. The lock is never held across
/// a brain call or a send.
pub struct Orchestrator<B: Brain, S: MessageSender> {
    /// Brain answering chat turns.
    brain: B,
    /// Message sender for Discord or other transports.
    sender: S,
    /// Where documents are persisted.
    store: JsonStore,
    /// Activity log.
    activity: EventLog,
    /// Error log.
    errors: EventLog,
    /// Runtime configuration.
    config: OrchestratorConfig,
    /// The single mutual-exclusion domain.
    state: Mutex<BotState>,
    /// Held for the duration of a tick.
    tick_guard: Mutex<()>,
    /// Randomness for joke selection and timing.
    rng: StdMutex<StdRng>,
}

impl<B: Brain, S: MessageSender> Orchestrator<B, S> {
    /// Create an orchestrator with fresh state.
    pub fn new(brain: B, sender: S, store: JsonStore, config: OrchestratorConfig) -> Self {
        let state = BotState::new(&config);
        Self::with_state(brain, sender, store, config, state)
    }

    /// Create an orchestrator from the documents in `store`.
    pub async fn load(
        brain: B,
        sender: S,
        store: JsonStore,
        config: OrchestratorConfig,
    ) -> Self {
        let state = BotState::load(&store, &config).await;
        Self::with_state(brain, sender, store, config, state)
    }

    fn with_state(
        brain: B,
        sender: S,
        store: JsonStore,
        config: OrchestratorConfig,
        state: BotState,
    ) -> Self {
        info!(
            "Orchestrator ready: brain={}, prefix={}, max_history={}, joke window {}",
            brain.name(),
            config.command_prefix,
            config.max_history,
            config.joke_window
        );

        Self {
            activity: store.activity_log(),
            errors: store.error_log(),
            brain,
            sender,
            store,
            config,
            state: Mutex::new(state),
            tick_guard: Mutex::new(()),
            rng: StdMutex::new(StdRng::from_entropy()),
        }
    }

    /// Process an incoming message and send the reply.
    pub async fn handle(&self, message: InboundMessage) -> Result<(), OrchestratorError> {
        let reply = self.process(message).await?;
        self.send_logged(&reply.channel_id, &reply.text, "reply_sent").await
    }

    /// Process an incoming message end-to-end and return the reply.
    ///
    /// Returns [`OrchestratorError::Skipped`] for messages that get no reply.
    pub async fn process(
        &self,
        message: InboundMessage,
    ) -> Result<OutboundMessage, OrchestratorError> {
        self.process_at(message, Utc::now()).await
    }

    /// [`process`](Self::process) with an explicit current time.
    pub async fn process_at(
        &self,
        mut message: InboundMessage,
        now: DateTime<Utc>,
    ) -> Result<OutboundMessage, OrchestratorError> {
        message.text = message.text.trim().to_string();
        if message.text.is_empty() {
            return Err(OrchestratorError::Skipped("empty message".to_string()));
        }

        match Command::parse(&message.text, &self.config.command_prefix) {
            Some(command) => {
                info!(
                    channel_id = %message.channel_id,
                    "Command '{}' from {}",
                    command.name(),
                    message.author_id
                );
                self.activity
                    .record(
                        "command",
                        json!({
                            "channel_id": message.channel_id,
                            "author_id": message.author_id,
                            "command": command.name(),
                        }),
                    )
                    .await;

                let text = match self.dispatch(&message, command, now).await {
                    Ok(text) => text,
                    Err(OrchestratorError::PermissionDenied(name)) => {
                        warn!("Denied '{}' for non-admin {}", name, message.author_id);
                        PERMISSION_DENIED_TEXT.to_string()
                    }
                    Err(e) => return Err(e),
                };
                Ok(OutboundMessage::reply_to(&message, text))
            }
            None => self.chat(&message).await,
        }
    }

    /// Run a chat turn.
    async fn chat(&self, message: &InboundMessage) -> Result<OutboundMessage, OrchestratorError> {
        let channel_id = message.channel_id.as_str();

        let request = {
            let mut state = self.state.lock().await;
            if !state.config.autoreply_enabled && !message.mentions_bot {
                return Err(OrchestratorError::Skipped("autoreply disabled".to_string()));
            }
            state
                .history
                .append(channel_id, HistoryMessage::user(message.text.as_str()));
            CompletionRequest::new(
                state.config.active_model.clone(),
                state.history.get(channel_id),
            )
        };

        let model = request.model.clone();
        debug!(channel_id, "Calling {} with {} messages", model, request.messages.len());

        if let Err(e) = self.sender.set_typing(channel_id, true).await {
            warn!("Failed to start typing indicator: {}", e);
        }

        let reply = match self.brain.complete(request).await {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_REPLY_TEXT.to_string()
                } else {
                    text
                };
                self.state
                    .lock()
                    .await
                    .history
                    .append(channel_id, HistoryMessage::assistant(text.as_str()));
                text
            }
            Err(e) => {
                error!(channel_id, "AI provider error: {}", e);
                self.errors
                    .record(
                        "ai_error",
                        json!({"channel_id": channel_id, "model": model, "error": e.to_string()}),
                    )
                    .await;
                AI_ERROR_TEXT.to_string()
            }
        };

        self.activity
            .record(
                "chat",
                json!({
                    "channel_id": channel_id,
                    "author_id": message.author_id,
                    "model": model,
                    "reply_chars": reply.chars().count(),
                }),
            )
            .await;

        Ok(OutboundMessage::reply_to(message, reply))
    }

    /// Execute a command and return the reply text.
    async fn dispatch(
        &self,
        message: &InboundMessage,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<String, OrchestratorError> {
        if command.is_admin_only() && !message.is_admin {
            return Err(OrchestratorError::PermissionDenied(command.name().to_string()));
        }

        let prefix = &self.config.command_prefix;
        match command {
            Command::Help => Ok(help_text(prefix)),
            Command::Unknown(word) => Ok(format!(
                "I don't know the command `{p}{w}`. Try `{p}help`.",
                p = prefix,
                w = word
            )),
            Command::Invalid { usage } => Ok(usage.to_string()),
            Command::Admin(admin) => self.dispatch_admin(message, admin).await,
            Command::DailyJoke(toggle) => {
                Ok(self.set_daily_joke(&message.channel_id, toggle).await)
            }
            Command::Schedule(request) => {
                Ok(self.schedule(&message.channel_id, request, now).await)
            }
        }
    }

    async fn dispatch_admin(
        &self,
        message: &InboundMessage,
        command: AdminCommand,
    ) -> Result<String, OrchestratorError> {
        match command {
            AdminCommand::ClearHistory => {
                self.state.lock().await.history.clear(&message.channel_id);
                info!(channel_id = %message.channel_id, "History cleared");
                Ok("Conversation history cleared for this channel. Fresh start!".to_string())
            }
            AdminCommand::SetModel(model) => {
                let mut state = self.state.lock().await;
                state.config.active_model = model.clone();
                self.persist(BOT_CONFIG_FILE, &state.config).await;
                info!("Active model set to {}", model);
                Ok(format!("Model set to `{}`.", model))
            }
            AdminCommand::ListModels => Ok(self.list_models().await),
            AdminCommand::Autoreply(toggle) => {
                let mut state = self.state.lock().await;
                state.config.autoreply_enabled = toggle.is_on();
                self.persist(BOT_CONFIG_FILE, &state.config).await;
                Ok(if toggle.is_on() {
                    "Auto-reply enabled. I'll answer every message.".to_string()
                } else {
                    "Auto-reply disabled. I'll only answer when mentioned.".to_string()
                })
            }
            AdminCommand::Invalid => Ok(ADMIN_USAGE.to_string()),
        }
    }

    async fn list_models(&self) -> String {
        match self.brain.list_models().await {
            Ok(mut models) => {
                models.sort();
                format_model_list(&models)
            }
            Err(e) => {
                error!("Failed to list models: {}", e);
                self.errors
                    .record("list_models_error", json!({"error": e.to_string()}))
                    .await;
                format!("Couldn't fetch the model list: {}", e)
            }
        }
    }

    async fn set_daily_joke(&self, channel_id: &str, toggle: Toggle) -> String {
        let mut state = self.state.lock().await;
        let changed = match toggle {
            Toggle::On => state.jokes.enable(channel_id),
            Toggle::Off => state.jokes.disable(channel_id),
        };
        if changed {
            self.persist(DAILYJOKE_FILE, &state.jokes).await;
        }

        match toggle {
            Toggle::On => format!(
                "Daily jokes enabled! Expect one between {} and {}.",
                self.config.joke_window.start(),
                self.config.joke_window.end()
            ),
            Toggle::Off => "Daily jokes disabled for this channel.".to_string(),
        }
    }

    async fn schedule(
        &self,
        channel_id: &str,
        request: ScheduleRequest,
        now: DateTime<Utc>,
    ) -> String {
        let send_time = next_occurrence(now, request.time);
        let item = ScheduledItem::new(channel_id, request.content, send_time, request.recurrence);

        let mut state = self.state.lock().await;
        state.schedule.push(item);
        self.persist(SCHEDULE_FILE, &state.schedule).await;
        drop(state);

        info!(channel_id, "Scheduled message for {}", send_time);
        let when = send_time.format("%Y-%m-%d %H:%M UTC");
        match request.recurrence {
            Recurrence::Daily => format!("Scheduled for {}, repeating daily.", when),
            Recurrence::None => format!("Scheduled for {}.", when),
        }
    }

    /// Run one scheduler tick at the current time.
    pub async fn tick(&self) -> TickReport {
        self.tick_at(Utc::now()).await
    }

    /// Run one scheduler tick at `now`.
    ///
    /// A tick started while another is running returns immediately with
    /// `skipped` set. Due work is removed from state before anything is
    /// sent, so each item goes out once.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> TickReport {
        let Ok(_guard) = self.tick_guard.try_lock() else {
            debug!("Previous tick still running, skipping");
            return TickReport {
                skipped: true,
                ..Default::default()
            };
        };

        let (due_items, jokes) = {
            let mut state = self.state.lock().await;

            let due_items = state.schedule.take_due(now);
            if !due_items.is_empty() {
                self.persist(SCHEDULE_FILE, &state.schedule).await;
            }

            let jokes = self.reconcile_jokes(&mut state.jokes, now);
            if jokes.changed {
                self.persist(DAILYJOKE_FILE, &state.jokes).await;
            }

            (due_items, jokes.due)
        };

        let mut report = TickReport::default();

        for item in &due_items {
            match self.send_logged(&item.channel_id, &item.content, "scheduled_sent").await {
                Ok(()) => report.scheduled_sent += 1,
                Err(_) => report.failures += 1,
            }
        }

        for (channel_id, joke) in &jokes {
            match self.send_logged(channel_id, joke, "joke_sent").await {
                Ok(()) => report.jokes_sent += 1,
                Err(_) => report.failures += 1,
            }
        }

        if report != TickReport::default() {
            info!(
                "Tick: {} scheduled, {} jokes, {} failures",
                report.scheduled_sent, report.jokes_sent, report.failures
            );
        }
        report
    }

    fn reconcile_jokes(&self, jokes: &mut JokeSubscriptions, now: DateTime<Utc>) -> JokesDue {
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        let tick = jokes.reconcile(now, &self.config.joke_window, &mut *rng);
        let due = tick
            .due
            .into_iter()
            .map(|channel_id| (channel_id, random_joke(&mut *rng)))
            .collect();
        JokesDue {
            due,
            changed: tick.changed,
        }
    }

    /// Write every document. Used at shutdown.
    pub async fn flush(&self) -> Result<(), OrchestratorError> {
        let state = self.state.lock().await;
        self.store.save(BOT_CONFIG_FILE, &state.config).await?;
        self.store.save(DAILYJOKE_FILE, &state.jokes).await?;
        self.store.save(SCHEDULE_FILE, &state.schedule).await?;
        info!("State flushed to {}", self.store.root().display());
        Ok(())
    }

    /// Send a message, logging the outcome to the activity or error log.
    async fn send_logged(
        &self,
        channel_id: &str,
        text: &str,
        event: &str,
    ) -> Result<(), OrchestratorError> {
        match self.sender.send_message(channel_id, text).await {
            Ok(()) => {
                self.activity
                    .record(event, json!({"channel_id": channel_id, "chars": text.chars().count()}))
                    .await;
                Ok(())
            }
            Err(e) => {
                error!(channel_id, "Failed to send message: {}", e);
                self.errors
                    .record(
                        "send_error",
                        json!({"channel_id": channel_id, "event": event, "error": e.to_string()}),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Save a document. Failures are logged and in-memory state is kept.
    async fn persist<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        if let Err(e) = self.store.save(name, value).await {
            error!("Failed to persist {}: {}", name, e);
            self.errors
                .record("persist_error", json!({"document": name, "error": e.to_string()}))
                .await;
        }
    }

    /// Snapshot of the bot settings.
    pub async fn bot_config(&self) -> BotConfig {
        self.state.lock().await.config.clone()
    }

    /// Snapshot of the scheduled messages.
    pub async fn schedule_snapshot(&self) -> Schedule {
        self.state.lock().await.schedule.clone()
    }

    /// Snapshot of the daily joke subscriptions.
    pub async fn jokes_snapshot(&self) -> JokeSubscriptions {
        self.state.lock().await.jokes.clone()
    }

    /// Snapshot of a channel's conversation window.
    pub async fn history(&self, channel_id: &str) -> Vec<HistoryMessage> {
        self.state.lock().await.history.get(channel_id)
    }

    /// Replace the directive. Windows reset on their next use.
    pub async fn set_directive(&self, directive: impl Into<String>) {
        self.state.lock().await.history.set_directive(directive);
    }

    /// Get the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Get the brain.
    pub fn brain(&self) -> &B {
        &self.brain
    }

    /// Get the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

struct JokesDue {
    due: Vec<(String, &'static str)>,
    changed: bool,
}

fn format_model_list(models: &[String]) -> String {
    if models.is_empty() {
        return "No models available.".to_string();
    }

    let shown = &models[..models.len().min(MAX_LISTED_MODELS)];
    let mut text = format!("Available models ({}):\n{}", models.len(), shown.join("\n"));
    if models.len() > shown.len() {
        text.push_str(&format!("\n...and {} more", models.len() - shown.len()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::RecordingSender;
    use mock_brain::{EchoBrain, FailingBrain, ScriptedBrain};

    async fn orchestrator<B: Brain>(
        brain: B,
        dir: &tempfile::TempDir,
    ) -> Orchestrator<B, RecordingSender> {
        let store = JsonStore::open(dir.path()).await.unwrap();
        let config = OrchestratorConfig::builder()
            .directive("be witty")
            .max_history(4)
            .build();
        Orchestrator::new(brain, RecordingSender::new(), store, config)
    }

    #[test]
    fn test_help_text_uses_prefix() {
        let text = help_text("?");
        assert!(text.contains("?dailyjoke"));
        assert!(text.contains("?admin setmodel"));
        assert!(!text.contains("!help"));
    }

    #[test]
    fn test_format_model_list_truncates() {
        let models: Vec<String> = (0..60).map(|i| format!("m{:02}", i)).collect();
        let text = format_model_list(&models);
        assert!(text.starts_with("Available models (60):"));
        assert!(text.contains("m49"));
        assert!(!text.contains("m50"));
        assert!(text.ends_with("...and 10 more"));

        assert_eq!(format_model_list(&[]), "No models available.");
    }

    #[tokio::test]
    async fn test_chat_appends_user_and_assistant() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::with_prefix("echo: "), &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "  hello  ", 1))
            .await
            .unwrap();
        assert_eq!(reply.channel_id, "c1");
        assert_eq!(reply.text, "echo: hello");

        let window = orch.history("c1").await;
        assert_eq!(window.len(), 3);
        assert_eq!(window[0], HistoryMessage::system("be witty"));
        assert_eq!(window[1], HistoryMessage::user("hello"));
        assert_eq!(window[2], HistoryMessage::assistant("echo: hello"));
    }

    #[tokio::test]
    async fn test_empty_reply_fallback_kept_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(ScriptedBrain::new(["   "]), &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "hi", 1))
            .await
            .unwrap();
        assert_eq!(reply.text, EMPTY_REPLY_TEXT);
        assert_eq!(
            orch.history("c1").await.last(),
            Some(&HistoryMessage::assistant(EMPTY_REPLY_TEXT))
        );
    }

    #[tokio::test]
    async fn test_ai_error_fallback_not_kept() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(FailingBrain::new("down"), &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "hi", 1))
            .await
            .unwrap();
        assert_eq!(reply.text, AI_ERROR_TEXT);

        let window = orch.history("c1").await;
        assert_eq!(window.len(), 2);
        assert_eq!(window[1], HistoryMessage::user("hi"));

        let log = std::fs::read_to_string(dir.path().join(json_store::ERROR_LOG_FILE)).unwrap();
        assert!(log.contains("\"ai_error\""));
    }

    #[tokio::test]
    async fn test_empty_message_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        let result = orch.process(InboundMessage::direct("u1", "c1", "   ", 1)).await;
        assert!(matches!(result, Err(OrchestratorError::Skipped(_))));
        assert_eq!(orch.history("c1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_invalid_commands_do_not_reach_brain() {
        let dir = tempfile::tempdir().unwrap();
        let brain = ScriptedBrain::new(["should not be used"]);
        let orch = orchestrator(brain, &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "!dance", 1))
            .await
            .unwrap();
        assert!(reply.text.contains("!help"));

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "!schedule 9am hi", 1))
            .await
            .unwrap();
        assert_eq!(reply.text, crate::commands::SCHEDULE_USAGE);

        assert!(orch.brain().requests().await.is_empty());
        assert!(orch.schedule_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_admin_usage_only_after_permission_check() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        let denied = orch
            .process(InboundMessage::direct("u1", "c1", "!admin", 1))
            .await
            .unwrap();
        assert_eq!(denied.text, PERMISSION_DENIED_TEXT);

        let usage = orch
            .process(InboundMessage::direct("u1", "c1", "!admin", 1).as_admin())
            .await
            .unwrap();
        assert_eq!(usage.text, ADMIN_USAGE);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        orch.process(InboundMessage::direct("u1", "c1", "hi", 1)).await.unwrap();
        assert_eq!(orch.history("c1").await.len(), 3);

        orch.process(InboundMessage::direct("u1", "c1", "!admin clearhistory", 2).as_admin())
            .await
            .unwrap();
        assert_eq!(orch.history("c1").await, vec![HistoryMessage::system("be witty")]);
    }

    #[tokio::test]
    async fn test_list_models_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let brain = EchoBrain::new().with_models(["zeta", "alpha"]);
        let orch = orchestrator(brain, &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "!admin listmodels", 1).as_admin())
            .await
            .unwrap();
        assert_eq!(reply.text, "Available models (2):\nalpha\nzeta");
    }

    #[tokio::test]
    async fn test_list_models_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(FailingBrain::new("down"), &dir).await;

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "!admin listmodels", 1).as_admin())
            .await
            .unwrap();
        assert!(reply.text.starts_with("Couldn't fetch the model list"));
    }

    #[tokio::test]
    async fn test_autoreply_off_requires_mention() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        orch.process(InboundMessage::direct("u1", "c1", "!admin autoreply off", 1).as_admin())
            .await
            .unwrap();
        assert!(!orch.bot_config().await.autoreply_enabled);

        let ignored = orch.process(InboundMessage::direct("u1", "c1", "hi", 2)).await;
        assert!(matches!(ignored, Err(OrchestratorError::Skipped(_))));
        assert_eq!(orch.history("c1").await.len(), 1);

        let reply = orch
            .process(InboundMessage::direct("u1", "c1", "hi bot", 3).mentioning_bot())
            .await
            .unwrap();
        assert_eq!(reply.text, "hi bot");
    }

    #[tokio::test]
    async fn test_handle_sends_reply() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        orch.handle(InboundMessage::direct("u1", "c1", "ping", 1)).await.unwrap();
        assert_eq!(orch.sender().sent_to("c1").await, vec!["ping"]);

        let log = std::fs::read_to_string(dir.path().join(json_store::ACTIVITY_LOG_FILE)).unwrap();
        assert!(log.contains("\"reply_sent\""));
    }

    #[tokio::test]
    async fn test_flush_writes_all_documents() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(EchoBrain::new(), &dir).await;

        orch.flush().await.unwrap();
        for file in [BOT_CONFIG_FILE, DAILYJOKE_FILE, SCHEDULE_FILE] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }
}
