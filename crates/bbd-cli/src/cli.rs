//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bbd_core::TimerKind;

/// Baby Buddy dashboard in your terminal.
///
/// Pulls feedings, sleep, diapers, tummy time, and growth data from a Baby
/// Buddy server and renders summaries, chart series, and live timers.
#[derive(Debug, Parser)]
#[command(name = "bbd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter config file.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Show today's activity, timelines, and active timers.
    Status {
        /// Emit the full snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show weekly, daily, and growth chart series.
    Report {
        /// Length of the daily-totals window in days.
        #[arg(long)]
        days: Option<u32>,

        /// Emit the series as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage running timers on the server.
    Timers {
        #[command(subcommand)]
        action: TimersAction,
    },

    /// Re-render the dashboard on every refresh until interrupted.
    Watch,
}

/// Timer operations.
#[derive(Debug, Subcommand)]
pub enum TimersAction {
    /// List running timers with elapsed time.
    List {
        /// Emit the timer list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start a new timer for the first child on the server.
    Start {
        /// What the timer tracks: feeding, sleep, or tummy.
        kind: TimerKind,
    },

    /// Stop tracking a timer locally; with --save, log the matching entry.
    Stop {
        /// Server id of the timer.
        id: i64,

        /// Log an entry from the timer so the server consumes it.
        #[arg(long)]
        save: bool,

        /// Feeding amount for a saved feeding entry.
        #[arg(long)]
        amount: Option<f64>,

        /// Notes for the saved entry.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a timer on the server without logging anything.
    Discard {
        /// Server id of the timer.
        id: i64,
    },
}
