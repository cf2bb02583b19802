//! End-to-end tests for commands, chat turns and ticks.

use std::time::Duration;

use async_trait::async_trait;
use brain_core::{HistoryMessage, InboundMessage};
use chrono::{DateTime, TimeZone, Utc};
use json_store::{JsonStore, ERROR_LOG_FILE};
use mock_brain::{EchoBrain, ScriptedBrain};
use orchestrator::{
    MessageSender, Orchestrator, OrchestratorConfig, OrchestratorError, RecordingSender,
    BOT_CONFIG_FILE, PERMISSION_DENIED_TEXT, SCHEDULE_FILE,
};
use scheduler::Recurrence;
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn config() -> OrchestratorConfig {
    OrchestratorConfig::builder()
        .directive("You are a test bot.")
        .max_history(4)
        .build()
}

async fn setup<B: brain_core::Brain>(brain: B) -> (TempDir, Orchestrator<B, RecordingSender>) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    let orch = Orchestrator::load(brain, RecordingSender::new(), store, config()).await;
    (dir, orch)
}

fn msg(text: &str) -> InboundMessage {
    InboundMessage::guild("u1", "c1", "g1", text, 0)
}

#[tokio::test]
async fn window_stays_bounded_and_keeps_directive() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    for i in 0..10 {
        orch.process(msg(&format!("message {i}"))).await.unwrap();
    }

    let window = orch.history("c1").await;
    assert_eq!(window.len(), 5);
    assert_eq!(window[0], HistoryMessage::system("You are a test bot."));
    assert_eq!(window[4], HistoryMessage::assistant("message 9"));
}

#[tokio::test]
async fn brain_sees_directive_first() {
    let (_dir, orch) = setup(ScriptedBrain::new(["hi there"])).await;

    orch.process(msg("hello")).await.unwrap();

    let requests = orch.brain().requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4o");
    assert_eq!(
        requests[0].messages,
        vec![
            HistoryMessage::system("You are a test bot."),
            HistoryMessage::user("hello"),
        ]
    );
}

#[tokio::test]
async fn directive_change_resets_windows() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    orch.process(msg("remember me")).await.unwrap();
    assert_eq!(orch.history("c1").await.len(), 3);

    orch.set_directive("You are a pirate.").await;
    assert_eq!(
        orch.history("c1").await,
        vec![HistoryMessage::system("You are a pirate.")]
    );
}

#[tokio::test]
async fn channels_have_separate_windows() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    orch.process(msg("in one")).await.unwrap();
    orch.process(InboundMessage::guild("u1", "c2", "g1", "in two", 0))
        .await
        .unwrap();

    assert_eq!(orch.history("c1").await[1], HistoryMessage::user("in one"));
    assert_eq!(orch.history("c2").await[1], HistoryMessage::user("in two"));
}

#[tokio::test]
async fn setmodel_requires_admin() {
    let (dir, orch) = setup(EchoBrain::new()).await;

    let reply = orch.process(msg("!admin setmodel gpt-x")).await.unwrap();
    assert_eq!(reply.text, PERMISSION_DENIED_TEXT);
    assert_eq!(orch.bot_config().await.active_model, "gpt-4o");
    assert!(!dir.path().join(BOT_CONFIG_FILE).exists());

    let reply = orch
        .process(msg("!admin setmodel gpt-x").as_admin())
        .await
        .unwrap();
    assert!(reply.text.contains("gpt-x"));
    assert_eq!(orch.bot_config().await.active_model, "gpt-x");

    let saved = std::fs::read_to_string(dir.path().join(BOT_CONFIG_FILE)).unwrap();
    assert!(saved.contains("\"gpt-x\""));
}

#[tokio::test]
async fn persist_failure_keeps_memory_state() {
    let (dir, orch) = setup(EchoBrain::new()).await;
    // A directory in the document's place makes the rename fail.
    std::fs::create_dir(dir.path().join(BOT_CONFIG_FILE)).unwrap();

    let reply = orch
        .process(msg("!admin setmodel gpt-z").as_admin())
        .await
        .unwrap();
    assert!(reply.text.contains("gpt-z"));
    assert_eq!(orch.bot_config().await.active_model, "gpt-z");

    let errors = std::fs::read_to_string(dir.path().join(ERROR_LOG_FILE)).unwrap();
    let record = errors
        .lines()
        .find(|line| line.contains("persist_error"))
        .expect("persist failure recorded");
    assert!(record.contains(BOT_CONFIG_FILE));
}

#[tokio::test]
async fn settings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = JsonStore::open(dir.path()).await.unwrap();
        let orch =
            Orchestrator::load(EchoBrain::new(), RecordingSender::new(), store, config()).await;
        orch.process(msg("!admin setmodel gpt-y").as_admin())
            .await
            .unwrap();
        orch.process(msg("!admin autoreply off").as_admin())
            .await
            .unwrap();
        orch.process_at(msg("!schedule 12:00 lunch daily"), at(2026, 3, 1, 10, 0))
            .await
            .unwrap();
    }

    let store = JsonStore::open(dir.path()).await.unwrap();
    let orch = Orchestrator::load(EchoBrain::new(), RecordingSender::new(), store, config()).await;

    let settings = orch.bot_config().await;
    assert_eq!(settings.active_model, "gpt-y");
    assert!(!settings.autoreply_enabled);

    let schedule = orch.schedule_snapshot().await;
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule.items()[0].recurrence, Recurrence::Daily);
}

#[tokio::test]
async fn schedule_targets_next_occurrence() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    let reply = orch
        .process_at(msg("!schedule 09:00 standup"), at(2026, 3, 1, 10, 0))
        .await
        .unwrap();
    assert!(reply.text.contains("2026-03-02 09:00"));

    orch.process_at(msg("!schedule 09:00 early"), at(2026, 3, 1, 8, 0))
        .await
        .unwrap();

    let schedule = orch.schedule_snapshot().await;
    let times: Vec<_> = schedule.items().iter().map(|i| i.send_time).collect();
    assert_eq!(times, vec![at(2026, 3, 2, 9, 0), at(2026, 3, 1, 9, 0)]);
}

#[tokio::test]
async fn tick_sends_due_items_once() {
    let (dir, orch) = setup(EchoBrain::new()).await;

    orch.process_at(msg("!schedule 09:00 once"), at(2026, 3, 1, 8, 0))
        .await
        .unwrap();
    orch.process_at(msg("!schedule 09:00 every day daily"), at(2026, 3, 1, 8, 0))
        .await
        .unwrap();

    let early = orch.tick_at(at(2026, 3, 1, 8, 59)).await;
    assert_eq!(early.scheduled_sent, 0);

    let report = orch.tick_at(at(2026, 3, 1, 9, 0)).await;
    assert_eq!(report.scheduled_sent, 2);
    assert_eq!(orch.sender().sent_to("c1").await, vec!["once", "every day"]);

    let again = orch.tick_at(at(2026, 3, 1, 9, 0)).await;
    assert_eq!(again.scheduled_sent, 0);

    let schedule = orch.schedule_snapshot().await;
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule.items()[0].content, "every day");
    assert_eq!(schedule.items()[0].send_time, at(2026, 3, 2, 9, 0));

    let saved = std::fs::read_to_string(dir.path().join(SCHEDULE_FILE)).unwrap();
    assert!(!saved.contains("\"once\""));
}

#[tokio::test]
async fn send_failure_does_not_block_other_items() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    let sender = RecordingSender::failing_for(["bad"]);
    let orch = Orchestrator::load(EchoBrain::new(), sender, store, config()).await;

    let now = at(2026, 3, 1, 8, 0);
    orch.process_at(InboundMessage::direct("u1", "bad", "!schedule 09:00 lost", 0), now)
        .await
        .unwrap();
    orch.process_at(msg("!schedule 09:00 delivered"), now)
        .await
        .unwrap();

    let report = orch.tick_at(at(2026, 3, 1, 9, 30)).await;
    assert_eq!(report.scheduled_sent, 1);
    assert_eq!(report.failures, 1);
    assert_eq!(orch.sender().sent_to("c1").await, vec!["delivered"]);
    assert!(orch.schedule_snapshot().await.is_empty());

    let errors = std::fs::read_to_string(dir.path().join(json_store::ERROR_LOG_FILE)).unwrap();
    assert!(errors.contains("\"send_error\""));
}

#[tokio::test]
async fn daily_joke_fires_once_per_day() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    let reply = orch.process(msg("!dailyjoke on")).await.unwrap();
    assert!(reply.text.contains("09:00"));

    let first = orch.tick_at(at(2026, 3, 1, 8, 0)).await;
    assert_eq!(first.jokes_sent, 0);

    let scheduled = orch.jokes_snapshot().await.get("c1").and_then(|s| s.next_time);
    let scheduled = scheduled.expect("joke time scheduled on first tick");
    assert!(scheduled > at(2026, 3, 1, 9, 0) - chrono::Duration::seconds(1));
    assert!(scheduled < at(2026, 3, 1, 17, 0));

    let second = orch.tick_at(at(2026, 3, 2, 8, 0)).await;
    assert_eq!(second.jokes_sent, 1);
    assert_eq!(orch.sender().sent_to("c1").await.len(), 1);

    let third = orch.tick_at(at(2026, 3, 2, 8, 0)).await;
    assert_eq!(third.jokes_sent, 0);

    let next = orch
        .jokes_snapshot()
        .await
        .get("c1")
        .and_then(|s| s.next_time)
        .unwrap();
    assert!(next >= at(2026, 3, 3, 9, 0));
    assert!(next < at(2026, 3, 3, 17, 0));
}

#[tokio::test]
async fn daily_joke_off_stops_jokes() {
    let (_dir, orch) = setup(EchoBrain::new()).await;

    orch.process(msg("!dailyjoke on")).await.unwrap();
    orch.tick_at(at(2026, 3, 1, 8, 0)).await;
    orch.process(msg("!dailyjoke off")).await.unwrap();

    let report = orch.tick_at(at(2026, 3, 2, 8, 0)).await;
    assert_eq!(report.jokes_sent, 0);
    assert!(orch.sender().sent().await.is_empty());
}

/// Sender that takes a while, so a tick stays in flight.
struct SlowSender {
    inner: RecordingSender,
}

#[async_trait]
impl MessageSender for SlowSender {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.inner.send_message(channel_id, text).await
    }
}

#[tokio::test]
async fn overlapping_ticks_send_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    let recorder = RecordingSender::new();
    let sender = SlowSender {
        inner: recorder.clone(),
    };
    let orch = Orchestrator::load(EchoBrain::new(), sender, store, config()).await;

    orch.process_at(msg("!schedule 09:00 only once"), at(2026, 3, 1, 8, 0))
        .await
        .unwrap();

    let now = at(2026, 3, 1, 9, 0);
    let (a, b) = tokio::join!(orch.tick_at(now), orch.tick_at(now));

    assert_eq!(a.scheduled_sent + b.scheduled_sent, 1);
    assert!(a.skipped || b.skipped);
    assert_eq!(recorder.sent_to("c1").await, vec!["only once"]);
}
