//! The published dashboard state.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use bbd_core::aggregate::{
    daily_amounts, daily_hours, growth_series, weekday_amounts, weekday_hours, weekday_minutes,
    DatePoint, DayBucket, GrowthPoint,
};
use bbd_core::{
    ActiveTimer, Child, DiaperChange, Feeding, Height, Sample, Sleep, Temperature, TummyTime,
    Weight,
};

/// Everything fetched in one refresh pass.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub child: Option<Child>,
    pub feedings_today: Vec<Feeding>,
    pub weekly_feedings: Vec<Feeding>,
    pub daily_feedings: Vec<Feeding>,
    pub sleep_recent: Vec<Sleep>,
    pub weekly_sleep: Vec<Sleep>,
    pub daily_sleep: Vec<Sleep>,
    pub changes_today: Vec<DiaperChange>,
    pub weekly_changes: Vec<DiaperChange>,
    pub tummy_today: Vec<TummyTime>,
    pub weekly_tummy: Vec<TummyTime>,
    pub temperatures: Vec<Temperature>,
    pub weights: Vec<Weight>,
    pub heights: Vec<Height>,
    pub timers: Vec<bbd_core::Timer>,
}

/// All chart series the rendering layer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesBundle {
    /// Weekday volume totals for feedings.
    pub weekly_feedings: Vec<DayBucket>,
    /// Weekday diaper-change counts.
    pub weekly_changes: Vec<DayBucket>,
    /// Weekday sleep hours.
    pub weekly_sleep: Vec<DayBucket>,
    /// Weekday tummy-time minutes.
    pub weekly_tummy: Vec<DayBucket>,
    /// Daily feeding volume over the configured window, leading zeros trimmed.
    pub daily_feedings: Vec<DatePoint>,
    /// Daily sleep hours over the configured window, leading zeros trimmed.
    pub daily_sleep: Vec<DatePoint>,
    pub weight: Vec<GrowthPoint>,
    pub height: Vec<GrowthPoint>,
    pub temperature: Vec<GrowthPoint>,
}

impl SeriesBundle {
    /// Rebuilds every series from a refresh pass.
    pub fn build(fetched: &Fetched, daily_window_days: u32, today: NaiveDate) -> Self {
        fn collect<T>(items: &[T], adapt: impl Fn(&T) -> Sample) -> Vec<Sample> {
            items.iter().map(adapt).collect()
        }

        Self {
            weekly_feedings: weekday_amounts(
                &collect(&fetched.weekly_feedings, Feeding::sample),
                today,
            ),
            weekly_changes: weekday_amounts(
                &collect(&fetched.weekly_changes, DiaperChange::sample),
                today,
            ),
            weekly_sleep: weekday_hours(&collect(&fetched.weekly_sleep, Sleep::sample), today),
            weekly_tummy: weekday_minutes(&collect(&fetched.weekly_tummy, TummyTime::sample), today),
            daily_feedings: daily_amounts(
                &collect(&fetched.daily_feedings, Feeding::sample),
                daily_window_days,
                today,
            ),
            daily_sleep: daily_hours(
                &collect(&fetched.daily_sleep, Sleep::sample),
                daily_window_days,
                today,
            ),
            weight: growth_series(fetched.weights.iter().map(Weight::point).collect()),
            height: growth_series(fetched.heights.iter().map(Height::point).collect()),
            temperature: growth_series(
                fetched.temperatures.iter().map(Temperature::point).collect(),
            ),
        }
    }
}

/// One published dashboard state. A failed refresh sets `error` and leaves
/// every other field at its last good value (stale-but-available).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub child: Option<Child>,
    pub feedings_today: Vec<Feeding>,
    pub sleep_recent: Vec<Sleep>,
    pub changes_today: Vec<DiaperChange>,
    pub tummy_today: Vec<TummyTime>,
    pub temperatures: Vec<Temperature>,
    pub series: SeriesBundle,
    pub timers: Vec<ActiveTimer>,
    /// Elapsed seconds per active timer id.
    pub elapsed: BTreeMap<i64, i64>,
    pub last_sync: Option<DateTime<Utc>>,
    pub error: Option<String>,
}
