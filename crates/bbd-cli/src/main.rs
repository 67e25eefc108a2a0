use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bbd_api::ApiClient;
use bbd_cli::commands::{init, report, status, timers, watch};
use bbd_cli::{Cli, Commands, Config, TimersAction};

/// Load config and build an API client from its credentials.
fn connect(config_path: Option<&Path>) -> Result<(ApiClient, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let client = ApiClient::new(config.api_config())
        .context("invalid server configuration; set base_url and api_key (see `bbd init`)")?;
    Ok((client, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Init { force }) => {
            init::run(*force)?;
        }
        Some(Commands::Status { json }) => {
            let (client, config) = connect(cli.config.as_deref())?;
            status::run(&mut stdout, &client, &config, *json).await?;
        }
        Some(Commands::Report { days, json }) => {
            let (client, config) = connect(cli.config.as_deref())?;
            report::run(&mut stdout, &client, &config, *days, *json).await?;
        }
        Some(Commands::Timers { action }) => {
            let (client, _config) = connect(cli.config.as_deref())?;
            match action {
                TimersAction::List { json } => timers::list(&mut stdout, &client, *json).await?,
                TimersAction::Start { kind } => timers::start(&mut stdout, &client, *kind).await?,
                TimersAction::Stop {
                    id,
                    save,
                    amount,
                    notes,
                } => {
                    timers::stop(&mut stdout, &client, *id, *save, *amount, notes.clone()).await?;
                }
                TimersAction::Discard { id } => timers::discard(&mut stdout, &client, *id).await?,
            }
        }
        Some(Commands::Watch) => {
            let (client, config) = connect(cli.config.as_deref())?;
            watch::run(&mut stdout, client, &config).await?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
