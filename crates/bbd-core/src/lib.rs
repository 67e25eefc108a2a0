//! Core domain logic for the Baby Buddy dashboard.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: typed care-tracking records as returned by the Baby Buddy API
//! - Aggregation: folding timestamped entries into trailing-window day buckets
//! - Timers: reconciling server-side running timers with local elapsed state
//!
//! Everything here is pure: no I/O, no clocks. Functions that depend on the
//! current date or time take it as an argument.

pub mod aggregate;
pub mod duration;
pub mod entry;
pub mod format;
pub mod timeline;
pub mod timer;
pub mod units;

pub use aggregate::{
    DEFAULT_DAILY_WINDOW, DatePoint, DayBucket, GrowthPoint, daily_amounts, daily_hours,
    growth_series, weekday_amounts, weekday_hours, weekday_minutes,
};
pub use duration::{duration_hours, parse_duration};
pub use entry::{
    Child, DiaperChange, Feeding, Height, Note, Pumping, Sample, Sleep, Temperature, Timer,
    TummyTime, Weight,
};
pub use timer::{ActiveTimer, TimerBoard, TimerKind, UnknownTimerKind};
pub use units::{UnitLabels, UnitSystem};
