//! The dashboard service actor.
//!
//! One task owns all mutable state. A refresh interval, a one-second
//! elapsed tick, command messages, and fetch-completion messages are
//! multiplexed with `select!`; fetches run on spawned tasks and report back
//! by message so a slow server never blocks the tick. Overlapping refreshes
//! resolve last-write-wins.

use std::time::Duration;

use chrono::{Local, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;

use bbd_api::{ApiClient, ApiError, ListQuery};
use bbd_core::aggregate::DEFAULT_DAILY_WINDOW;
use bbd_core::{ActiveTimer, TimerBoard, TimerKind};

use crate::snapshot::{Fetched, SeriesBundle, Snapshot};

/// Per-category fetch limits, matching the refresh cadence of the original
/// dashboard: generous for today's lists, wider for weekly series.
const TODAY_LIMIT: u32 = 100;
const WEEK_LIMIT: u32 = 200;
const DAILY_LIMIT: u32 = 500;
const GROWTH_LIMIT: u32 = 20;
const TEMP_LIMIT: u32 = 10;

/// Service configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How often the full data set is re-fetched.
    pub refresh_interval: Duration,
    /// Length of the daily-totals trailing window.
    pub daily_window_days: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            daily_window_days: DEFAULT_DAILY_WINDOW,
        }
    }
}

/// Dashboard service errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// No refresh has delivered a child profile yet.
    #[error("no child profile loaded yet")]
    NoChild,
    /// The actor task is gone (shutdown or dropped).
    #[error("dashboard service stopped")]
    Closed,
}

enum Command {
    /// Optimistic add after a successful start request.
    Insert(ActiveTimer),
    /// Local-only removal; replies with the pre-removal snapshot.
    Stop {
        id: i64,
        reply: oneshot::Sender<Option<ActiveTimer>>,
    },
    /// Local removal after a confirmed server delete.
    Remove(i64),
    Refresh,
    Shutdown,
}

/// Fetches every record category the dashboard consumes, in parallel.
pub async fn fetch_all(client: &ApiClient, config: &SyncConfig) -> Result<Fetched, ApiError> {
    let now = Local::now();
    let today = now.date_naive();
    let today_min = format!("{today}T00:00:00");
    let today_max = format!("{today}T23:59:59");
    let sleep_min = (now - chrono::Duration::hours(24))
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let week_min = format!("{}T00:00:00", today - chrono::Duration::days(6));
    let daily_min = format!(
        "{}T00:00:00",
        today - chrono::Duration::days(i64::from(config.daily_window_days) - 1)
    );

    let feedings_today_query = ListQuery::new()
        .start_min(today_min.as_str())
        .start_max(today_max.as_str())
        .limit(TODAY_LIMIT)
        .ordering("-start");
    let weekly_feedings_query = ListQuery::new()
        .start_min(week_min.as_str())
        .limit(WEEK_LIMIT)
        .ordering("-start");
    let daily_feedings_query = ListQuery::new()
        .start_min(daily_min.as_str())
        .limit(DAILY_LIMIT)
        .ordering("-start");
    let sleep_recent_query = ListQuery::new()
        .start_min(sleep_min.as_str())
        .limit(TODAY_LIMIT)
        .ordering("-start");
    let weekly_sleep_query = ListQuery::new()
        .start_min(week_min.as_str())
        .limit(WEEK_LIMIT)
        .ordering("-start");
    let daily_sleep_query = ListQuery::new()
        .start_min(daily_min.as_str())
        .limit(DAILY_LIMIT)
        .ordering("-start");
    let changes_today_query = ListQuery::new()
        .date_min(today_min.as_str())
        .date_max(today_max.as_str())
        .limit(TODAY_LIMIT)
        .ordering("-time");
    let weekly_changes_query = ListQuery::new()
        .date_min(week_min.as_str())
        .limit(WEEK_LIMIT)
        .ordering("-time");
    let tummy_today_query = ListQuery::new()
        .start_min(today_min.as_str())
        .start_max(today_max.as_str())
        .limit(TODAY_LIMIT)
        .ordering("-start");
    let weekly_tummy_query = ListQuery::new()
        .start_min(week_min.as_str())
        .limit(WEEK_LIMIT)
        .ordering("-start");
    let temperature_query = ListQuery::new().limit(TEMP_LIMIT).ordering("-time");
    let weight_query = ListQuery::new().limit(GROWTH_LIMIT).ordering("-date");
    let height_query = ListQuery::new().limit(GROWTH_LIMIT).ordering("-date");

    let (
        children,
        feedings_today,
        weekly_feedings,
        daily_feedings,
        sleep_recent,
        weekly_sleep,
        daily_sleep,
        changes_today,
        weekly_changes,
        tummy_today,
        weekly_tummy,
        temperatures,
        weights,
        heights,
        timers,
    ) = tokio::try_join!(
        client.children(),
        client.feedings(&feedings_today_query),
        client.feedings(&weekly_feedings_query),
        client.feedings(&daily_feedings_query),
        client.sleep(&sleep_recent_query),
        client.sleep(&weekly_sleep_query),
        client.sleep(&daily_sleep_query),
        client.changes(&changes_today_query),
        client.changes(&weekly_changes_query),
        client.tummy_times(&tummy_today_query),
        client.tummy_times(&weekly_tummy_query),
        client.temperature(&temperature_query),
        client.weight(&weight_query),
        client.height(&height_query),
        client.timers(),
    )?;

    Ok(Fetched {
        child: children.results.into_iter().next(),
        feedings_today: feedings_today.results,
        weekly_feedings: weekly_feedings.results,
        daily_feedings: daily_feedings.results,
        sleep_recent: sleep_recent.results,
        weekly_sleep: weekly_sleep.results,
        daily_sleep: daily_sleep.results,
        changes_today: changes_today.results,
        weekly_changes: weekly_changes.results,
        tummy_today: tummy_today.results,
        weekly_tummy: weekly_tummy.results,
        temperatures: temperatures.results,
        weights: weights.results,
        heights: heights.results,
        timers: timers.results,
    })
}

/// One-shot snapshot for commands that don't need the live service.
pub async fn fetch_snapshot(
    client: &ApiClient,
    config: &SyncConfig,
) -> Result<Snapshot, ApiError> {
    let fetched = fetch_all(client, config).await?;
    let today = Local::now().date_naive();
    let series = SeriesBundle::build(&fetched, config.daily_window_days, today);

    let mut board = TimerBoard::new();
    board.resync(fetched.timers.iter().map(ActiveTimer::from));
    let now = Utc::now();

    Ok(Snapshot {
        child: fetched.child,
        feedings_today: fetched.feedings_today,
        sleep_recent: fetched.sleep_recent,
        changes_today: fetched.changes_today,
        tummy_today: fetched.tummy_today,
        temperatures: fetched.temperatures,
        series,
        timers: board.to_vec(),
        elapsed: board.elapsed(now),
        last_sync: Some(now),
        error: None,
    })
}

/// Handle to a running dashboard service.
///
/// Cloneable; dropping every handle stops the actor.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    client: ApiClient,
    cmd_tx: mpsc::Sender<Command>,
    watch_rx: watch::Receiver<Snapshot>,
}

impl DashboardHandle {
    /// A receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.watch_rx.clone()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.watch_rx.borrow().clone()
    }

    /// Starts a server-side timer of the given kind and adds it locally
    /// ahead of the next refresh. A failed request changes nothing.
    pub async fn start_timer(&self, kind: TimerKind) -> Result<ActiveTimer, SyncError> {
        let child = self
            .snapshot()
            .child
            .map(|c| c.id)
            .ok_or(SyncError::NoChild)?;
        let timer = self.client.create_timer(child, kind.default_name()).await?;
        let active = ActiveTimer::from(&timer);
        self.cmd_tx
            .send(Command::Insert(active.clone()))
            .await
            .map_err(|_| SyncError::Closed)?;
        Ok(active)
    }

    /// Removes a timer locally and returns its pre-removal snapshot for
    /// entry pre-fill. The server is deliberately NOT asked to delete it:
    /// Baby Buddy consumes the timer when an entry is created against it,
    /// and an abandoned entry means the timer reappears on the next refresh.
    pub async fn stop_timer(&self, id: i64) -> Result<Option<ActiveTimer>, SyncError> {
        let (reply, response) = oneshot::channel();
        self.cmd_tx
            .send(Command::Stop { id, reply })
            .await
            .map_err(|_| SyncError::Closed)?;
        response.await.map_err(|_| SyncError::Closed)
    }

    /// Deletes a timer on the server, then removes it locally. A failed
    /// delete leaves local state unchanged.
    pub async fn discard_timer(&self, id: i64) -> Result<(), SyncError> {
        self.client.delete_timer(id).await?;
        self.cmd_tx
            .send(Command::Remove(id))
            .await
            .map_err(|_| SyncError::Closed)?;
        Ok(())
    }

    /// Triggers an immediate refresh in addition to the periodic one.
    pub async fn refresh_now(&self) -> Result<(), SyncError> {
        self.cmd_tx
            .send(Command::Refresh)
            .await
            .map_err(|_| SyncError::Closed)
    }

    /// Stops the periodic refresh, the tick, and the actor.
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
    }
}

/// Spawns the dashboard service and returns its handle.
///
/// The first refresh starts immediately; subscribers see an empty snapshot
/// until it lands.
pub fn spawn(client: ApiClient, config: SyncConfig) -> DashboardHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (watch_tx, watch_rx) = watch::channel(Snapshot::default());
    tokio::spawn(run_actor(client.clone(), config, cmd_rx, watch_tx));
    DashboardHandle {
        client,
        cmd_tx,
        watch_rx,
    }
}

fn spawn_fetch(
    client: &ApiClient,
    config: &SyncConfig,
    results: &mpsc::Sender<Result<Fetched, ApiError>>,
) {
    let client = client.clone();
    let config = config.clone();
    let results = results.clone();
    tokio::spawn(async move {
        // The receiver only disappears on shutdown; a dropped result is fine.
        let _ = results.send(fetch_all(&client, &config).await).await;
    });
}

async fn run_actor(
    client: ApiClient,
    config: SyncConfig,
    mut cmd_rx: mpsc::Receiver<Command>,
    watch_tx: watch::Sender<Snapshot>,
) {
    let (fetch_tx, mut fetch_rx) = mpsc::channel(4);

    let mut refresh = tokio::time::interval(config.refresh_interval);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut board = TimerBoard::new();

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                spawn_fetch(&client, &config, &fetch_tx);
            }
            Some(outcome) = fetch_rx.recv() => {
                match outcome {
                    Ok(fetched) => apply_fetched(&watch_tx, &mut board, &config, fetched),
                    Err(err) => {
                        tracing::warn!(error = %err, "refresh failed; keeping stale data");
                        watch_tx.send_modify(|snap| snap.error = Some(err.to_string()));
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Insert(timer)) => {
                        board.insert(timer);
                        publish_timers(&watch_tx, &board);
                    }
                    Some(Command::Stop { id, reply }) => {
                        let snapshot = board.remove(id);
                        publish_timers(&watch_tx, &board);
                        let _ = reply.send(snapshot);
                    }
                    Some(Command::Remove(id)) => {
                        board.remove(id);
                        publish_timers(&watch_tx, &board);
                    }
                    Some(Command::Refresh) => {
                        spawn_fetch(&client, &config, &fetch_tx);
                    }
                    Some(Command::Shutdown) | None => break,
                }
            }
            _ = tick.tick() => {
                if !board.is_empty() {
                    publish_timers(&watch_tx, &board);
                }
            }
        }
    }
}

fn apply_fetched(
    watch_tx: &watch::Sender<Snapshot>,
    board: &mut TimerBoard,
    config: &SyncConfig,
    fetched: Fetched,
) {
    let today = Local::now().date_naive();
    board.resync(fetched.timers.iter().map(ActiveTimer::from));
    let series = SeriesBundle::build(&fetched, config.daily_window_days, today);
    let now = Utc::now();
    let timers = board.to_vec();
    let elapsed = board.elapsed(now);

    watch_tx.send_modify(|snap| {
        snap.child = fetched.child;
        snap.feedings_today = fetched.feedings_today;
        snap.sleep_recent = fetched.sleep_recent;
        snap.changes_today = fetched.changes_today;
        snap.tummy_today = fetched.tummy_today;
        snap.temperatures = fetched.temperatures;
        snap.series = series;
        snap.timers = timers;
        snap.elapsed = elapsed;
        snap.last_sync = Some(now);
        snap.error = None;
    });
}

fn publish_timers(watch_tx: &watch::Sender<Snapshot>, board: &TimerBoard) {
    let timers = board.to_vec();
    let elapsed = board.elapsed(Utc::now());
    watch_tx.send_modify(|snap| {
        snap.timers = timers;
        snap.elapsed = elapsed;
    });
}
