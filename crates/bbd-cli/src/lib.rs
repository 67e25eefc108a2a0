//! Baby Buddy dashboard CLI library.
//!
//! This crate provides the CLI interface for the dashboard.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, TimersAction};
pub use config::Config;
