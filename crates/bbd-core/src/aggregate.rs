//! Trailing-window aggregation for chart series.
//!
//! Every function here takes the reference day (`today`, a local calendar
//! date) as an explicit argument so callers control the window and tests are
//! deterministic. Buckets are created fresh per call, seeded at zero, and
//! folded by local calendar date; samples outside the window are skipped
//! silently. Rounding happens once, at output, never per sample.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::entry::Sample;

/// Default length of the daily-totals trailing window.
pub const DEFAULT_DAILY_WINDOW: u32 = 30;

/// One weekday bucket, labeled `Sun`..`Sat`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DayBucket {
    pub day: String,
    pub total: f64,
}

/// One calendar-day bucket, labeled `Mon DD` style (e.g. `Jan 5`).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DatePoint {
    pub date: String,
    pub total: f64,
}

/// One point of a scalar trend series (weight, height, temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GrowthPoint {
    pub date: String,
    pub value: f64,
}

/// The trailing `days`-day window ending at `today`, oldest first.
fn trailing_window(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|i| today - Duration::days(i64::from(i)))
        .collect()
}

/// Sums samples into per-date slots over the given window.
fn fold(samples: &[Sample], window: &[NaiveDate]) -> HashMap<NaiveDate, f64> {
    let mut sums: HashMap<NaiveDate, f64> = window.iter().map(|d| (*d, 0.0)).collect();
    for sample in samples {
        if let Some(total) = sums.get_mut(&sample.at.date()) {
            *total += sample.value;
        }
    }
    sums
}

fn weekday_series<F>(samples: &[Sample], today: NaiveDate, round: F) -> Vec<DayBucket>
where
    F: Fn(f64) -> f64,
{
    let window = trailing_window(today, 7);
    let sums = fold(samples, &window);
    window
        .iter()
        .map(|date| DayBucket {
            day: date.format("%a").to_string(),
            total: round(sums[date]),
        })
        .collect()
}

/// Seven buckets of summed sample values (today and the six preceding local
/// days, oldest first), rounded to the nearest integer at output.
pub fn weekday_amounts(samples: &[Sample], today: NaiveDate) -> Vec<DayBucket> {
    weekday_series(samples, today, f64::round)
}

/// Seven buckets of summed duration-hours, rounded to one decimal place.
pub fn weekday_hours(samples: &[Sample], today: NaiveDate) -> Vec<DayBucket> {
    weekday_series(samples, today, |total| (total * 10.0).round() / 10.0)
}

/// Seven buckets of summed duration-hours converted to whole minutes.
/// Used for short-duration domains like tummy time.
pub fn weekday_minutes(samples: &[Sample], today: NaiveDate) -> Vec<DayBucket> {
    weekday_series(samples, today, |total| (total * 60.0).round())
}

fn daily_series<F>(samples: &[Sample], days: u32, today: NaiveDate, round: F) -> Vec<DatePoint>
where
    F: Fn(f64) -> f64,
{
    let window = trailing_window(today, days);
    let sums = fold(samples, &window);
    let series: Vec<DatePoint> = window
        .iter()
        .map(|date| DatePoint {
            date: date.format("%b %-d").to_string(),
            total: round(sums[date]),
        })
        .collect();

    // Trim leading all-zero days so sparse history doesn't pad the chart
    // start; an entirely-zero series is returned as-is.
    match series.iter().position(|point| point.total > 0.0) {
        Some(first) if first > 0 => series[first..].to_vec(),
        _ => series,
    }
}

/// Trailing `days`-day totals of sample values, rounded to integers, with
/// leading all-zero days trimmed.
pub fn daily_amounts(samples: &[Sample], days: u32, today: NaiveDate) -> Vec<DatePoint> {
    daily_series(samples, days, today, f64::round)
}

/// Trailing `days`-day totals of duration-hours, rounded to one decimal
/// place, with leading all-zero days trimmed.
pub fn daily_hours(samples: &[Sample], days: u32, today: NaiveDate) -> Vec<DatePoint> {
    daily_series(samples, days, today, |total| (total * 10.0).round() / 10.0)
}

/// Scalar trend series: sorted ascending by date, one point per record.
/// Same-day duplicates each keep their own point.
pub fn growth_series(mut points: Vec<(NaiveDate, f64)>) -> Vec<GrowthPoint> {
    points.sort_by_key(|(date, _)| *date);
    points
        .into_iter()
        .map(|(date, value)| GrowthPoint {
            date: date.format("%b %-d").to_string(),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn sample(ts: NaiveDateTime, value: f64) -> Sample {
        Sample { at: ts, value }
    }

    #[test]
    fn weekday_output_is_always_seven_buckets() {
        let today = day(2024, 1, 7);
        assert_eq!(weekday_amounts(&[], today).len(), 7);
        let samples = vec![sample(at(2024, 1, 5, 9), 100.0)];
        assert_eq!(weekday_amounts(&samples, today).len(), 7);
    }

    #[test]
    fn weekday_labels_are_chronological_ending_today() {
        // 2024-01-07 is a Sunday; the window runs Mon Jan 1 .. Sun Jan 7.
        let buckets = weekday_amounts(&[], day(2024, 1, 7));
        let labels: Vec<&str> = buckets.iter().map(|b| b.day.as_str()).collect();
        assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "bucket totals are exact in fixtures")]
    fn out_of_window_samples_do_not_affect_totals() {
        let today = day(2024, 1, 7);
        let samples = vec![
            sample(at(2024, 1, 1, 8), 100.0),
            sample(at(2024, 1, 8, 8), 999.0),  // future: outside the window
            sample(at(2023, 12, 31, 8), 50.0), // eighth day back: outside
        ];
        let buckets = weekday_amounts(&samples, today);
        let total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, 100.0);
        assert_eq!(buckets[0].day, "Mon");
        assert_eq!(buckets[0].total, 100.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "bucket totals are exact in fixtures")]
    fn rounding_happens_once_at_output() {
        // 0.4 + 0.4 = 0.8 rounds to 1; per-sample rounding would give 0.
        let today = day(2024, 1, 7);
        let samples = vec![
            sample(at(2024, 1, 7, 8), 0.4),
            sample(at(2024, 1, 7, 12), 0.4),
        ];
        let buckets = weekday_amounts(&samples, today);
        assert_eq!(buckets[6].total, 1.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "bucket totals are exact in fixtures")]
    fn weekday_hours_round_to_one_decimal() {
        let today = day(2024, 1, 7);
        let samples = vec![
            sample(at(2024, 1, 6, 13), 1.5),
            sample(at(2024, 1, 6, 20), 0.77),
        ];
        let buckets = weekday_hours(&samples, today);
        assert_eq!(buckets[5].total, 2.3);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "bucket totals are exact in fixtures")]
    fn weekday_minutes_convert_hours() {
        let today = day(2024, 1, 7);
        // 0.25h + 0.33h = 0.58h -> 35 minutes (34.8 rounded once)
        let samples = vec![
            sample(at(2024, 1, 7, 9), 0.25),
            sample(at(2024, 1, 7, 16), 0.33),
        ];
        let buckets = weekday_minutes(&samples, today);
        assert_eq!(buckets[6].total, 35.0);
    }

    #[test]
    fn daily_totals_trim_leading_zero_days() {
        let today = day(2024, 3, 30);
        let samples: Vec<Sample> = (0..5)
            .map(|i| sample(at(2024, 3, 26 + i, 9), 100.0))
            .collect();
        let series = daily_amounts(&samples, 30, today);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].date, "Mar 26");
    }

    #[test]
    fn all_zero_daily_series_is_untrimmed() {
        let series = daily_amounts(&[], 30, day(2024, 3, 30));
        assert_eq!(series.len(), 30);
    }

    #[test]
    fn nonzero_first_bucket_is_untrimmed() {
        let today = day(2024, 3, 30);
        let samples = vec![sample(at(2024, 3, 1, 9), 42.0)];
        let series = daily_amounts(&samples, 30, today);
        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, "Mar 1");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let today = day(2024, 1, 7);
        let samples = vec![
            sample(at(2024, 1, 3, 8), 100.0),
            sample(at(2024, 1, 5, 9), 80.0),
        ];
        assert_eq!(
            weekday_amounts(&samples, today),
            weekday_amounts(&samples, today)
        );
        assert_eq!(
            daily_amounts(&samples, 30, today),
            daily_amounts(&samples, 30, today)
        );
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "trend values are exact in fixtures")]
    fn growth_series_sorts_and_keeps_same_day_duplicates() {
        let points = vec![
            (day(2024, 2, 10), 5.1),
            (day(2024, 1, 15), 4.6),
            (day(2024, 2, 10), 5.2),
        ];
        let series = growth_series(points);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, "Jan 15");
        assert_eq!(series[1].value, 5.1);
        assert_eq!(series[2].value, 5.2);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "bucket totals are exact in fixtures")]
    fn window_boundary_matches_seven_day_contract() {
        // With today = 2024-01-07, the window is [Jan 1, Jan 7] inclusive;
        // a Jan 8 event is out of window entirely.
        let today = day(2024, 1, 7);
        let samples = vec![
            sample(at(2024, 1, 1, 8), 100.0),
            sample(at(2024, 1, 8, 8), 999.0),
        ];
        let buckets = weekday_amounts(&samples, today);
        let nonzero: Vec<&DayBucket> = buckets.iter().filter(|b| b.total > 0.0).collect();
        assert_eq!(nonzero.len(), 1);
        assert_eq!(nonzero[0].day, "Mon");
        assert_eq!(nonzero[0].total, 100.0);
    }
}
