//! Typed care-tracking records as returned by the Baby Buddy API.
//!
//! Each category keeps the server's field names. Timestamps arrive either as
//! RFC 3339 strings with an offset or as naive local wall-clock strings; both
//! are normalized at deserialization so day-bucket assignment always works on
//! the local calendar rather than on UTC string prefixes.
//!
//! Aggregatable categories expose a `sample()` adapter producing the
//! canonical [`Sample`] shape consumed by [`crate::aggregate`]; the
//! aggregation functions never branch on category field names.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::duration_hours;

/// A canonical aggregation input: one local timestamp and one numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Local wall-clock time of the event.
    pub at: NaiveDateTime,
    /// The measure being accumulated (volume, hours, count, ...).
    pub value: f64,
}

/// A child profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl Child {
    /// Full display name.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A feeding entry. `amount` is in the configured volume unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feeding {
    pub id: i64,
    pub child: i64,
    #[serde(deserialize_with = "ts::de_local")]
    pub start: NaiveDateTime,
    #[serde(default, deserialize_with = "ts::de_local_opt")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Feeding {
    /// Volume sample at the feeding's start; a missing amount counts as zero.
    pub fn sample(&self) -> Sample {
        Sample {
            at: self.start,
            value: self.amount.unwrap_or(0.0),
        }
    }
}

/// A sleep entry with an `HH:MM:SS` duration string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sleep {
    pub id: i64,
    pub child: i64,
    #[serde(deserialize_with = "ts::de_local")]
    pub start: NaiveDateTime,
    #[serde(default, deserialize_with = "ts::de_local_opt")]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub nap: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Sleep {
    /// Duration-hours sample at the sleep's start.
    pub fn sample(&self) -> Sample {
        Sample {
            at: self.start,
            value: duration_hours(self.duration.as_deref()),
        }
    }
}

/// A diaper change. `wet`/`solid` may both be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaperChange {
    pub id: i64,
    pub child: i64,
    #[serde(deserialize_with = "ts::de_local")]
    pub time: NaiveDateTime,
    #[serde(default)]
    pub wet: bool,
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DiaperChange {
    /// Count sample: each change contributes one to its day.
    pub fn sample(&self) -> Sample {
        Sample {
            at: self.time,
            value: 1.0,
        }
    }
}

/// A tummy-time entry with an `HH:MM:SS` duration string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TummyTime {
    pub id: i64,
    pub child: i64,
    #[serde(deserialize_with = "ts::de_local")]
    pub start: NaiveDateTime,
    #[serde(default, deserialize_with = "ts::de_local_opt")]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
}

impl TummyTime {
    /// Duration-hours sample at the session's start.
    pub fn sample(&self) -> Sample {
        Sample {
            at: self.start,
            value: duration_hours(self.duration.as_deref()),
        }
    }
}

/// A temperature reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Temperature {
    pub id: i64,
    pub child: i64,
    pub temperature: f64,
    #[serde(deserialize_with = "ts::de_local")]
    pub time: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Temperature {
    /// Trend point for [`crate::aggregate::growth_series`].
    pub fn point(&self) -> (NaiveDate, f64) {
        (self.time.date(), self.temperature)
    }
}

/// A weight measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub id: i64,
    pub child: i64,
    pub weight: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Weight {
    pub fn point(&self) -> (NaiveDate, f64) {
        (self.date, self.weight)
    }
}

/// A height measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Height {
    pub id: i64,
    pub child: i64,
    pub height: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Height {
    pub fn point(&self) -> (NaiveDate, f64) {
        (self.date, self.height)
    }
}

/// A pumping entry. Older servers report `time`, newer ones `start`/`end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pumping {
    pub id: i64,
    pub child: i64,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "ts::de_local_opt")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "ts::de_local_opt")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Pumping {
    /// Volume sample; the timestamp falls back `start` then `time`.
    pub fn sample(&self) -> Option<Sample> {
        let at = self.start.or(self.time)?;
        Some(Sample {
            at,
            value: self.amount.unwrap_or(0.0),
        })
    }
}

/// A free-form note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub child: i64,
    pub note: String,
    #[serde(deserialize_with = "ts::de_local")]
    pub time: NaiveDateTime,
}

/// A server-side running timer. The `start` instant is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub id: i64,
    #[serde(default)]
    pub child: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "ts::de_instant")]
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Timestamp normalization.
///
/// Offset-carrying strings are converted through the local time zone; naive
/// strings are taken as local wall-clock time already. Bare dates land at
/// local midnight. Day buckets must come from `(year, month, day)` of the
/// local clock, never from slicing an ISO/UTC string.
pub(crate) mod ts {
    use super::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};

    pub(crate) fn parse_local(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.and_time(NaiveTime::MIN))
            .ok()
    }

    pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub(crate) fn de_local<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_local(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(crate) fn de_local_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse_local(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }

    pub(crate) fn de_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
