//! Live dashboard service for the Baby Buddy dashboard.
//!
//! Generalizes the original UI hook pair into a stateful service: a periodic
//! full-data refresh rebuilds every chart series and resyncs the timer
//! board; a one-second tick recomputes elapsed times; snapshots are
//! published over a `watch` channel. All mutable state lives on one actor
//! task.

mod service;
mod snapshot;

pub use service::{
    DashboardHandle, SyncConfig, SyncError, fetch_all, fetch_snapshot, spawn,
};
pub use snapshot::{Fetched, SeriesBundle, Snapshot};
