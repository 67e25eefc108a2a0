//! Human-readable formatting helpers for rendered output.
//!
//! All functions take the reference time explicitly so rendering is
//! deterministic under test.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::duration::duration_hours;

/// Formats elapsed seconds as zero-padded `MM:SS`.
/// Minutes may exceed 59 for long-running timers.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Coarse "how long ago" description of a past timestamp.
pub fn time_ago(at: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Wall-clock `HH:MM` for timeline rows.
pub fn format_clock(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

/// Display form of a raw duration string: em dash when absent, whole
/// minutes under an hour, otherwise hours to one decimal.
pub fn format_duration_text(duration: Option<&str>) -> String {
    match duration {
        None | Some("") => "\u{2014}".to_string(),
        Some(raw) => {
            let hours = duration_hours(Some(raw));
            if hours < 1.0 {
                format!("{}m", (hours * 60.0).round())
            } else {
                format!("{hours:.1}h")
            }
        }
    }
}

/// Age display for the dashboard header: days under a month, months and
/// days under a year, then years with a month remainder.
pub fn format_age(birth: NaiveDate, today: NaiveDate) -> String {
    let mut months = i64::from(today.year() - birth.year()) * 12
        + i64::from(today.month())
        - i64::from(birth.month());
    let day_diff = i64::from(today.day()) - i64::from(birth.day());
    if day_diff < 0 {
        months -= 1;
    }
    let adjusted_days = if day_diff < 0 { 30 + day_diff } else { day_diff };

    if months < 1 {
        let days = (today - birth).num_days().max(0);
        return format!("{days} days");
    }
    if months < 12 {
        return format!("{months}mo {adjusted_days}d");
    }
    let years = months / 12;
    let remaining = months % 12;
    if remaining == 0 {
        format!("{years}y")
    } else {
        format!("{years}y {remaining}mo")
    }
}
