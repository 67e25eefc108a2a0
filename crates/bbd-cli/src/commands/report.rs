//! Report command: weekly, daily, and growth chart series as text tables.

use std::io::Write;

use anyhow::Result;

use bbd_api::ApiClient;
use bbd_core::{DatePoint, DayBucket, GrowthPoint, UnitSystem};
use bbd_sync::{SeriesBundle, fetch_snapshot};

use crate::Config;

pub async fn run<W: Write>(
    writer: &mut W,
    client: &ApiClient,
    config: &Config,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut sync_config = config.sync_config();
    if let Some(days) = days {
        sync_config.daily_window_days = days;
    }
    let snapshot = fetch_snapshot(client, &sync_config).await?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &snapshot.series)?;
        writeln!(writer)?;
        return Ok(());
    }

    render(writer, &snapshot.series, config.units)
}

fn weekday_table<W: Write>(writer: &mut W, title: &str, buckets: &[DayBucket]) -> Result<()> {
    writeln!(writer, "{title}")?;
    for bucket in buckets {
        writeln!(writer, "  {:<4}{:>8}", bucket.day, bucket.total)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn daily_table<W: Write>(writer: &mut W, title: &str, points: &[DatePoint]) -> Result<()> {
    writeln!(writer, "{title}")?;
    if points.is_empty() {
        writeln!(writer, "  no data")?;
    }
    for point in points {
        writeln!(writer, "  {:<8}{:>8}", point.date, point.total)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn growth_line<W: Write>(writer: &mut W, label: &str, unit: &str, points: &[GrowthPoint]) -> Result<()> {
    match points.last() {
        Some(point) => writeln!(
            writer,
            "  {label}: {} {unit} ({}, {} readings)",
            point.value,
            point.date,
            points.len()
        )?,
        None => writeln!(writer, "  {label}: no data")?,
    }
    Ok(())
}

/// Renders every series as aligned text tables.
pub fn render<W: Write>(writer: &mut W, series: &SeriesBundle, units: UnitSystem) -> Result<()> {
    let labels = units.labels();

    weekday_table(
        writer,
        &format!("Feedings by weekday ({})", labels.volume),
        &series.weekly_feedings,
    )?;
    weekday_table(writer, "Diaper changes by weekday", &series.weekly_changes)?;
    weekday_table(writer, "Sleep by weekday (h)", &series.weekly_sleep)?;
    weekday_table(writer, "Tummy time by weekday (min)", &series.weekly_tummy)?;

    daily_table(
        writer,
        &format!("Daily feedings ({})", labels.volume),
        &series.daily_feedings,
    )?;
    daily_table(writer, "Daily sleep (h)", &series.daily_sleep)?;

    writeln!(writer, "Growth")?;
    growth_line(writer, "weight", labels.weight, &series.weight)?;
    growth_line(writer, "height", labels.length, &series.height)?;
    growth_line(writer, "temperature", labels.temp, &series.temperature)?;

    Ok(())
}
