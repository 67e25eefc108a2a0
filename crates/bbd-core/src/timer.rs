//! Local mirror of server-side running timers.
//!
//! The server owns the timer list; [`TimerBoard::resync`] replaces local
//! state wholesale on every refresh so local drift (including a silently
//! failed stop or discard) is corrected eventually. Elapsed time is always
//! derived from `now - start`, never by incrementing a counter, so missed
//! ticks cannot accumulate error.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Timer;

/// The activity a timer tracks, classified from its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Feeding,
    Sleep,
    TummyTime,
}

impl TimerKind {
    /// Classifies a timer by case-insensitive substrings of its name.
    /// Anything unrecognized is a feeding, matching how entries are logged.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("sleep") {
            Self::Sleep
        } else if name.contains("tummy") {
            Self::TummyTime
        } else {
            Self::Feeding
        }
    }

    /// Display name used when creating a timer of this kind.
    pub const fn default_name(&self) -> &'static str {
        match self {
            Self::Feeding => "Feeding",
            Self::Sleep => "Sleep",
            Self::TummyTime => "Tummy time",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_name())
    }
}

impl FromStr for TimerKind {
    type Err = UnknownTimerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feeding" => Ok(Self::Feeding),
            "sleep" => Ok(Self::Sleep),
            "tummy" | "tummy-time" | "tummy_time" => Ok(Self::TummyTime),
            _ => Err(UnknownTimerKind(s.to_string())),
        }
    }
}

/// Error type for unknown timer kind strings.
#[derive(Debug, Clone)]
pub struct UnknownTimerKind(String);

impl fmt::Display for UnknownTimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown timer kind: {} (expected feeding, sleep, or tummy)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTimerKind {}

/// A running timer mirrored locally for live display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub id: i64,
    pub name: String,
    /// Server-reported start instant; never extrapolated locally.
    pub start: DateTime<Utc>,
}

impl ActiveTimer {
    pub fn kind(&self) -> TimerKind {
        TimerKind::from_name(&self.name)
    }

    /// Whole elapsed seconds, floored, clamped to zero for clock skew.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start).num_seconds().max(0)
    }
}

impl From<&Timer> for ActiveTimer {
    fn from(timer: &Timer) -> Self {
        Self {
            id: timer.id,
            name: timer
                .name
                .clone()
                .unwrap_or_else(|| "timer".to_string()),
            start: timer.start,
        }
    }
}

/// Local state for all currently running timers, keyed by server id.
#[derive(Debug, Clone, Default)]
pub struct TimerBoard {
    timers: BTreeMap<i64, ActiveTimer>,
}

impl TimerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces local state wholesale with the server-reported list.
    ///
    /// Full resync, not an incremental diff: ids absent from the list are
    /// dropped, ids present take the server's start instant.
    pub fn resync<I>(&mut self, timers: I)
    where
        I: IntoIterator<Item = ActiveTimer>,
    {
        self.timers = timers.into_iter().map(|t| (t.id, t)).collect();
    }

    /// Optimistically adds a timer ahead of the next refresh.
    pub fn insert(&mut self, timer: ActiveTimer) {
        self.timers.insert(timer.id, timer);
    }

    /// Removes a timer locally, returning its pre-removal snapshot.
    pub fn remove(&mut self, id: i64) -> Option<ActiveTimer> {
        self.timers.remove(&id)
    }

    pub fn get(&self, id: i64) -> Option<&ActiveTimer> {
        self.timers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveTimer> {
        self.timers.values()
    }

    pub fn to_vec(&self) -> Vec<ActiveTimer> {
        self.timers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Elapsed seconds per timer, derived from the fixed start instants.
    pub fn elapsed(&self, now: DateTime<Utc>) -> BTreeMap<i64, i64> {
        self.timers
            .values()
            .map(|t| (t.id, t.elapsed_secs(now)))
            .collect()
    }
}
