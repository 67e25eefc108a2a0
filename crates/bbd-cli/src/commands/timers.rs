//! Timer subcommands: list, start, stop, discard.
//!
//! Stopping never deletes the timer on the server. A timer is consumed by
//! the server when an entry is saved from it (`--save`); a plain stop
//! leaves it running remotely, and `discard` deletes it outright.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;

use bbd_api::{ApiClient, NewFeeding, NewSleep, NewTummyTime};
use bbd_core::format::format_elapsed;
use bbd_core::{ActiveTimer, TimerKind};

/// One row of `timers list --json`.
#[derive(Debug, Serialize)]
struct TimerRow {
    id: i64,
    name: String,
    kind: TimerKind,
    start: DateTime<Utc>,
    elapsed_secs: i64,
}

async fn active_timers(client: &ApiClient) -> Result<Vec<ActiveTimer>> {
    let page = client.timers().await.context("failed to list timers")?;
    Ok(page.results.iter().map(ActiveTimer::from).collect())
}

fn render_list<W: Write>(writer: &mut W, timers: &[ActiveTimer], now: DateTime<Utc>) -> Result<()> {
    if timers.is_empty() {
        writeln!(writer, "No running timers.")?;
        return Ok(());
    }
    for timer in timers {
        writeln!(
            writer,
            "[{}] {} ({})  {}",
            timer.id,
            timer.name,
            timer.kind(),
            format_elapsed(timer.elapsed_secs(now))
        )?;
    }
    Ok(())
}

pub async fn list<W: Write>(writer: &mut W, client: &ApiClient, json: bool) -> Result<()> {
    let timers = active_timers(client).await?;
    let now = Utc::now();

    if json {
        let rows: Vec<TimerRow> = timers
            .iter()
            .map(|t| TimerRow {
                id: t.id,
                name: t.name.clone(),
                kind: t.kind(),
                start: t.start,
                elapsed_secs: t.elapsed_secs(now),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    render_list(writer, &timers, now)
}

pub async fn start<W: Write>(writer: &mut W, client: &ApiClient, kind: TimerKind) -> Result<()> {
    let children = client.children().await.context("failed to list children")?;
    let Some(child) = children.results.first() else {
        bail!("no child found on the server; add one in Baby Buddy first");
    };

    let timer = client
        .create_timer(child.id, kind.default_name())
        .await
        .context("failed to start timer")?;
    writeln!(
        writer,
        "Started {} timer [{}] for {}",
        kind,
        timer.id,
        child.name()
    )?;
    Ok(())
}

pub async fn stop<W: Write>(
    writer: &mut W,
    client: &ApiClient,
    id: i64,
    save: bool,
    amount: Option<f64>,
    notes: Option<String>,
) -> Result<()> {
    let timers = active_timers(client).await?;
    let Some(timer) = timers.iter().find(|t| t.id == id) else {
        bail!("no running timer with id {id}");
    };

    writeln!(
        writer,
        "Stopped [{}] {} at {}",
        timer.id,
        timer.name,
        format_elapsed(timer.elapsed_secs(Utc::now()))
    )?;

    if !save {
        writeln!(
            writer,
            "Timer left running on the server; save an entry from it or discard it."
        )?;
        return Ok(());
    }

    match timer.kind() {
        TimerKind::Feeding => {
            client
                .create_feeding(&NewFeeding {
                    timer: id,
                    kind: "breast milk".to_string(),
                    method: "bottle".to_string(),
                    amount,
                    notes,
                })
                .await
                .context("failed to save feeding")?;
            writeln!(writer, "Logged feeding from timer [{id}]")?;
        }
        TimerKind::Sleep => {
            client
                .create_sleep(&NewSleep {
                    timer: id,
                    nap: None,
                    notes,
                })
                .await
                .context("failed to save sleep")?;
            writeln!(writer, "Logged sleep from timer [{id}]")?;
        }
        TimerKind::TummyTime => {
            client
                .create_tummy_time(&NewTummyTime {
                    timer: id,
                    milestone: notes,
                })
                .await
                .context("failed to save tummy time")?;
            writeln!(writer, "Logged tummy time from timer [{id}]")?;
        }
    }
    Ok(())
}

pub async fn discard<W: Write>(writer: &mut W, client: &ApiClient, id: i64) -> Result<()> {
    client
        .delete_timer(id)
        .await
        .with_context(|| format!("failed to discard timer {id}"))?;
    writeln!(writer, "Discarded timer [{id}]")?;
    Ok(())
}
