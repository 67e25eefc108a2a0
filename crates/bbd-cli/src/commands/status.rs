//! Status command: one-shot dashboard snapshot.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use bbd_api::ApiClient;
use bbd_core::UnitSystem;
use bbd_core::format::{format_age, format_elapsed};
use bbd_core::timeline::{diaper_timeline, feeding_timeline, sleep_blocks};
use bbd_core::{DiaperChange, duration_hours};
use bbd_sync::{Snapshot, fetch_snapshot};

use crate::Config;

pub async fn run<W: Write>(writer: &mut W, client: &ApiClient, config: &Config, json: bool) -> Result<()> {
    let snapshot = fetch_snapshot(client, &config.sync_config()).await?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
        writeln!(writer)?;
        return Ok(());
    }

    render(writer, &snapshot, config.units, Local::now().naive_local())
}

/// Counts of today's diaper changes by kind.
fn diaper_counts(changes: &[DiaperChange]) -> (usize, usize, usize) {
    let mut wet = 0;
    let mut solid = 0;
    let mut both = 0;
    for change in changes {
        match (change.wet, change.solid) {
            (true, true) => both += 1,
            (false, true) => solid += 1,
            _ => wet += 1,
        }
    }
    (wet, solid, both)
}

/// Renders the dashboard. Pure in `snapshot` and `now` so tests are
/// deterministic; only the last-sync line consults the local timezone.
pub fn render<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    units: UnitSystem,
    now: NaiveDateTime,
) -> Result<()> {
    let labels = units.labels();

    match &snapshot.child {
        Some(child) => {
            writeln!(
                writer,
                "{} \u{2014} {}",
                child.name(),
                format_age(child.birth_date, now.date())
            )?;
        }
        None => writeln!(writer, "No child found on the server.")?,
    }

    if !snapshot.timers.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Active timers:")?;
        for timer in &snapshot.timers {
            let elapsed = snapshot.elapsed.get(&timer.id).copied().unwrap_or(0);
            writeln!(
                writer,
                "  [{}] {}  {}",
                timer.id,
                timer.name,
                format_elapsed(elapsed)
            )?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Today:")?;

    let total_amount: f64 = snapshot
        .feedings_today
        .iter()
        .filter_map(|f| f.amount)
        .sum();
    writeln!(
        writer,
        "  Feedings: {} \u{b7} {:.0} {}",
        snapshot.feedings_today.len(),
        total_amount,
        labels.volume
    )?;
    for item in feeding_timeline(&snapshot.feedings_today, labels.volume, now) {
        writeln!(writer, "    {}  {}  {}", item.time, item.label, item.detail)?;
    }

    let (wet, solid, both) = diaper_counts(&snapshot.changes_today);
    writeln!(
        writer,
        "  Diapers: {} ({wet} wet, {solid} solid, {both} both)",
        snapshot.changes_today.len()
    )?;
    for item in diaper_timeline(&snapshot.changes_today, now) {
        writeln!(writer, "    {}  {}  {}", item.time, item.kind.as_str(), item.ago)?;
    }

    let sleep_hours: f64 = snapshot
        .sleep_recent
        .iter()
        .map(|s| duration_hours(s.duration.as_deref()))
        .sum();
    writeln!(writer, "  Sleep (last 24h): {sleep_hours:.1}h")?;
    for block in sleep_blocks(&snapshot.sleep_recent) {
        let nap = if block.nap { " nap" } else { "" };
        writeln!(
            writer,
            "    {}\u{2013}{}  {:.1}h{nap}",
            block.start, block.end, block.hours
        )?;
    }

    let tummy_minutes: f64 = snapshot
        .tummy_today
        .iter()
        .map(|t| duration_hours(t.duration.as_deref()) * 60.0)
        .sum();
    writeln!(writer, "  Tummy time: {:.0} min", tummy_minutes.round())?;

    if let Some(temp) = snapshot.temperatures.first() {
        writeln!(writer, "  Temperature: {:.1} {}", temp.temperature, labels.temp)?;
    }

    writeln!(writer)?;
    match snapshot.last_sync {
        Some(at) => writeln!(
            writer,
            "Last sync: {}",
            at.with_timezone(&Local).format("%H:%M:%S")
        )?,
        None => writeln!(writer, "Last sync: never")?,
    }
    if let Some(error) = &snapshot.error {
        writeln!(writer, "Refresh failed: {error}")?;
    }

    Ok(())
}
