//! Watch command: live dashboard driven by the sync service.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;

use bbd_api::ApiClient;
use bbd_sync::spawn;

use crate::Config;
use crate::commands::status;

/// ANSI clear-screen plus cursor home.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Runs the dashboard service and re-renders on every published snapshot
/// until Ctrl-C.
pub async fn run<W: Write>(writer: &mut W, client: ApiClient, config: &Config) -> Result<()> {
    let handle = spawn(client, config.sync_config());
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                write!(writer, "{CLEAR}")?;
                status::render(writer, &snapshot, config.units, Local::now().naive_local())?;
                writeln!(writer, "\nPress Ctrl-C to exit.")?;
                writer.flush()?;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
