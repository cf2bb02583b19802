//! Scheduled announcements.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How often a scheduled item repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// Sent once, then removed.
    #[default]
    None,
    /// Sent every day at the same UTC time.
    Daily,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "once",
            Recurrence::Daily => "daily",
        }
    }
}

/// A message to post to a channel at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub channel_id: String,
    pub content: String,
    pub send_time: DateTime<Utc>,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl ScheduledItem {
    pub fn new(
        channel_id: impl Into<String>,
        content: impl Into<String>,
        send_time: DateTime<Utc>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            content: content.into(),
            send_time,
            recurrence,
        }
    }

    /// Whether the item should be sent on a tick at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.send_time <= now
    }

    /// The item's next occurrence after being dispatched at `now`.
    ///
    /// Recurring items move forward from their own target time in whole
    /// days until they are in the future, so the time of day never drifts.
    /// One-shot items have no next occurrence.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> Option<ScheduledItem> {
        match self.recurrence {
            Recurrence::None => None,
            Recurrence::Daily => {
                let mut next = self.send_time + Duration::days(1);
                while next <= now {
                    next += Duration::days(1);
                }
                Some(Self {
                    send_time: next,
                    ..self.clone()
                })
            }
        }
    }
}

/// The full set of pending scheduled items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    items: Vec<ScheduledItem>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ScheduledItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ScheduledItem) {
        self.items.push(item);
    }

    /// Remove every item due at `now` and return them for dispatch.
    ///
    /// Recurring items are re-enqueued with their next target time before
    /// this returns, so a due item is handed out exactly once.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledItem> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.items.drain(..).partition(|item| item.is_due(now));
        self.items = pending;

        for item in &due {
            if let Some(next) = item.next_occurrence(now) {
                debug!(
                    channel_id = %item.channel_id,
                    "Rescheduled daily item for {}",
                    next.send_time
                );
                self.items.push(next);
            }
        }

        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_one_shot_removed_when_due() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduledItem::new(
            "1",
            "hello",
            utc("2024-01-01T09:00:00Z"),
            Recurrence::None,
        ));

        let due = schedule.take_due(utc("2024-01-01T09:00:30Z"));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].content, "hello");
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_daily_advances_exactly_one_day() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduledItem::new(
            "1",
            "standup",
            utc("2024-01-01T09:00:00Z"),
            Recurrence::Daily,
        ));

        let due = schedule.take_due(utc("2024-01-01T09:00:45Z"));
        assert_eq!(due.len(), 1);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.items()[0].send_time, utc("2024-01-02T09:00:00Z"));
        assert_eq!(schedule.items()[0].recurrence, Recurrence::Daily);
    }

    #[test]
    fn test_daily_skips_missed_days() {
        let item = ScheduledItem::new("1", "x", utc("2024-01-01T09:00:00Z"), Recurrence::Daily);
        let next = item.next_occurrence(utc("2024-01-04T12:00:00Z")).unwrap();
        assert_eq!(next.send_time, utc("2024-01-05T09:00:00Z"));
    }

    #[test]
    fn test_not_due_items_untouched() {
        let mut schedule = Schedule::new();
        let later = ScheduledItem::new("1", "later", utc("2024-01-01T18:00:00Z"), Recurrence::None);
        schedule.push(later.clone());

        assert!(schedule.take_due(utc("2024-01-01T09:00:00Z")).is_empty());
        assert_eq!(schedule.items(), &[later]);
    }

    #[test]
    fn test_second_take_returns_nothing() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduledItem::new("1", "a", utc("2024-01-01T09:00:00Z"), Recurrence::None));
        schedule.push(ScheduledItem::new("2", "b", utc("2024-01-01T09:00:00Z"), Recurrence::Daily));

        let now = utc("2024-01-01T09:01:00Z");
        assert_eq!(schedule.take_due(now).len(), 2);
        assert!(schedule.take_due(now).is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduledItem::new(
            "42",
            "hi",
            utc("2024-01-01T09:00:00Z"),
            Recurrence::Daily,
        ));

        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(
            value,
            json!([{
                "channel_id": "42",
                "content": "hi",
                "send_time": "2024-01-01T09:00:00Z",
                "recurrence": "daily"
            }])
        );
    }

    #[test]
    fn test_recurrence_defaults_to_none() {
        let item: ScheduledItem = serde_json::from_value(json!({
            "channel_id": "1",
            "content": "hi",
            "send_time": "2024-01-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.recurrence, Recurrence::None);
    }
}
