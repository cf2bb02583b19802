//! Daily joke subscriptions and their posting window.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::time::{at_minute, parse_hhmm, TimeOfDay};

/// Daily posting window `[start, end)` in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JokeWindow {
    start: TimeOfDay,
    end: TimeOfDay,
    offset: FixedOffset,
}

impl JokeWindow {
    /// Create a window. `start` must be before `end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay, offset: FixedOffset) -> Result<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidWindow(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end, offset })
    }

    /// Parse `HH:MM-HH:MM` with the given offset in minutes east of UTC.
    pub fn parse(spec: &str, offset_minutes: i32) -> Result<Self> {
        let invalid = || ScheduleError::InvalidWindow(spec.to_string());
        let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
        let start = parse_hhmm(start).map_err(|_| invalid())?;
        let end = parse_hhmm(end).map_err(|_| invalid())?;
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ScheduleError::InvalidOffset(offset_minutes))?;
        Self::new(start, end, offset)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// A random instant in the window strictly after `now`: later today if
    /// today's window still has room, otherwise in tomorrow's window.
    pub fn next_after<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();
        let minute_now = i64::from(local.hour() * 60 + local.minute());

        let first = self.start.minutes().max(minute_now + 1);
        if first < self.end.minutes() {
            return self.pick(today, first, rng);
        }
        self.pick(today + Duration::days(1), self.start.minutes(), rng)
    }

    /// A random instant in the window on the local day after the one
    /// containing `now`.
    pub fn on_following_day<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> DateTime<Utc> {
        let tomorrow = now.with_timezone(&self.offset).date_naive() + Duration::days(1);
        self.pick(tomorrow, self.start.minutes(), rng)
    }

    fn pick<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        from_minute: i64,
        rng: &mut R,
    ) -> DateTime<Utc> {
        let minute = rng.gen_range(from_minute..self.end.minutes());
        let local = at_minute(date, minute);
        let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }
}

impl Default for JokeWindow {
    fn default() -> Self {
        Self {
            start: TimeOfDay::at(9, 0),
            end: TimeOfDay::at(17, 0),
            offset: Utc.fix(),
        }
    }
}

impl fmt::Display for JokeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (UTC{})", self.start, self.end, self.offset)
    }
}

impl FromStr for JokeWindow {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 0)
    }
}

/// One channel's daily joke subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyJokeSubscription {
    pub channel_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub next_time: Option<DateTime<Utc>>,
}

/// Outcome of one reconciliation pass over the subscriptions.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JokeTick {
    /// Channels whose joke is due now.
    pub due: Vec<String>,
    /// Whether any subscription was modified.
    pub changed: bool,
}

/// All subscriptions keyed by channel id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokeSubscriptions {
    channels: BTreeMap<String, DailyJokeSubscription>,
}

impl JokeSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel_id: &str) -> Option<&DailyJokeSubscription> {
        self.channels.get(channel_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Turn jokes on for a channel. Returns `true` if anything changed.
    ///
    /// An already-enabled subscription keeps its pending time. A new or
    /// disabled one starts without a time so the next tick schedules it.
    pub fn enable(&mut self, channel_id: &str) -> bool {
        match self.channels.get_mut(channel_id) {
            Some(sub) if sub.enabled => false,
            Some(sub) => {
                sub.enabled = true;
                sub.next_time = None;
                true
            }
            None => {
                self.channels.insert(
                    channel_id.to_string(),
                    DailyJokeSubscription {
                        channel_id: channel_id.to_string(),
                        enabled: true,
                        next_time: None,
                    },
                );
                true
            }
        }
    }

    /// Turn jokes off for a channel, keeping the entry. Returns `true` if
    /// anything changed.
    pub fn disable(&mut self, channel_id: &str) -> bool {
        match self.channels.get_mut(channel_id) {
            Some(sub) if sub.enabled || sub.next_time.is_some() => {
                sub.enabled = false;
                sub.next_time = None;
                true
            }
            _ => false,
        }
    }

    /// Advance every enabled subscription to `now`.
    ///
    /// A subscription without a time only gets one scheduled; it never fires
    /// on the same pass. A due subscription is reported and moved to the
    /// next local day's window.
    pub fn reconcile<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        window: &JokeWindow,
        rng: &mut R,
    ) -> JokeTick {
        let mut tick = JokeTick::default();

        for sub in self.channels.values_mut().filter(|sub| sub.enabled) {
            match sub.next_time {
                None => {
                    let next = window.next_after(now, rng);
                    debug!(channel_id = %sub.channel_id, "Scheduled daily joke for {}", next);
                    sub.next_time = Some(next);
                    tick.changed = true;
                }
                Some(at) if at <= now => {
                    let next = window.on_following_day(now, rng);
                    debug!(channel_id = %sub.channel_id, "Daily joke due, next at {}", next);
                    sub.next_time = Some(next);
                    tick.due.push(sub.channel_id.clone());
                    tick.changed = true;
                }
                Some(_) => {}
            }
        }

        tick
    }
}
