//! Render-prep transforms: raw entries into display rows.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::duration::duration_hours;
use crate::entry::{DiaperChange, Feeding, Sleep};
use crate::format::{format_clock, time_ago};

/// One feeding row for the recent-activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedingItem {
    pub time: String,
    pub label: String,
    pub detail: String,
    pub amount: f64,
}

/// Builds feeding timeline rows. The row's time prefers the feeding's end;
/// the label combines amount, unit, and method when present.
pub fn feeding_timeline(
    feedings: &[Feeding],
    volume_unit: &str,
    now: NaiveDateTime,
) -> Vec<FeedingItem> {
    feedings
        .iter()
        .map(|f| {
            let at = f.end.unwrap_or(f.start);
            let method = f.method.as_deref().or(f.kind.as_deref()).unwrap_or("");
            let label = match f.amount {
                Some(amount) => format!("{amount:.0} {volume_unit} {method}")
                    .trim_end()
                    .to_string(),
                None if method.is_empty() => "Feeding".to_string(),
                None => method.to_string(),
            };
            FeedingItem {
                time: format_clock(at),
                label,
                detail: time_ago(at, now),
                amount: f.amount.unwrap_or(0.0),
            }
        })
        .collect()
}

/// What a diaper change contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaperKind {
    Wet,
    Solid,
    Both,
}

impl DiaperKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wet => "wet",
            Self::Solid => "solid",
            Self::Both => "both",
        }
    }
}

/// One diaper-change row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaperItem {
    pub time: String,
    pub kind: DiaperKind,
    pub ago: String,
}

pub fn diaper_timeline(changes: &[DiaperChange], now: NaiveDateTime) -> Vec<DiaperItem> {
    changes
        .iter()
        .map(|c| {
            let kind = match (c.wet, c.solid) {
                (true, true) => DiaperKind::Both,
                (_, true) => DiaperKind::Solid,
                _ => DiaperKind::Wet,
            };
            DiaperItem {
                time: format_clock(c.time),
                kind,
                ago: time_ago(c.time, now),
            }
        })
        .collect()
}

/// One sleep block: start and end clock times plus duration in hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepBlock {
    pub start: String,
    /// `"ongoing"` when the entry has no end yet.
    pub end: String,
    pub hours: f64,
    pub nap: bool,
}

pub fn sleep_blocks(entries: &[Sleep]) -> Vec<SleepBlock> {
    entries
        .iter()
        .map(|s| SleepBlock {
            start: format_clock(s.start),
            end: s.end.map_or_else(|| "ongoing".to_string(), format_clock),
            hours: duration_hours(s.duration.as_deref()),
            nap: s.nap.unwrap_or(false),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn feeding(amount: Option<f64>, method: Option<&str>) -> Feeding {
        Feeding {
            id: 1,
            child: 1,
            start: dt(8, 0),
            end: Some(dt(8, 15)),
            kind: Some("breast milk".to_string()),
            method: method.map(String::from),
            amount,
            duration: Some("00:15:00".to_string()),
            notes: None,
        }
    }

    #[test]
    fn feeding_label_combines_amount_unit_method() {
        let rows = feeding_timeline(&[feeding(Some(120.0), Some("bottle"))], "mL", dt(10, 15));
        assert_eq!(rows[0].time, "08:15");
        assert_eq!(rows[0].label, "120 mL bottle");
        assert_eq!(rows[0].detail, "2h ago");
    }

    #[test]
    fn feeding_without_amount_falls_back_to_method_then_generic() {
        let rows = feeding_timeline(&[feeding(None, Some("left breast"))], "mL", dt(9, 0));
        assert_eq!(rows[0].label, "left breast");

        let mut bare = feeding(None, None);
        bare.kind = None;
        let rows = feeding_timeline(&[bare], "mL", dt(9, 0));
        assert_eq!(rows[0].label, "Feeding");
    }

    #[test]
    fn diaper_kind_resolution() {
        let change = |wet, solid| DiaperChange {
            id: 1,
            child: 1,
            time: dt(9, 0),
            wet,
            solid,
            color: None,
            amount: None,
            notes: None,
        };
        let rows = diaper_timeline(
            &[change(true, true), change(false, true), change(true, false)],
            dt(10, 0),
        );
        assert_eq!(rows[0].kind, DiaperKind::Both);
        assert_eq!(rows[1].kind, DiaperKind::Solid);
        assert_eq!(rows[2].kind, DiaperKind::Wet);
        assert_eq!(rows[0].ago, "1h ago");
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended for fixtures")]
    fn open_sleep_block_is_ongoing() {
        let sleep = Sleep {
            id: 1,
            child: 1,
            start: dt(13, 0),
            end: None,
            duration: None,
            nap: Some(true),
            notes: None,
        };
        let blocks = sleep_blocks(&[sleep]);
        assert_eq!(blocks[0].start, "13:00");
        assert_eq!(blocks[0].end, "ongoing");
        assert_eq!(blocks[0].hours, 0.0);
        assert!(blocks[0].nap);
    }
}
