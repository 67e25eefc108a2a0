//! CLI subcommand implementations.

pub mod init;
pub mod report;
pub mod status;
pub mod timers;
pub mod watch;
