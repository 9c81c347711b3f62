//! hebdate CLI - today's Hebrew date from the Hebcal converter
//!
//! Command implementations live in [`commands`]; this file only parses
//! arguments, installs logging, and dispatches.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;

use cli::{CacheCommand, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    execute_command(&cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let config = hebdate_core::Config::load_in(cli.config_dir.as_deref())?;
    let stdout = std::io::stdout();

    match &cli.command {
        None | Some(Commands::Show) => {
            let options = commands::ShowOptions {
                format: cli.format,
                no_cache: cli.no_cache,
                icon_url: cli.icon_url.clone(),
            };
            commands::show(&config, &options, stdout.lock()).await?;
        },
        Some(Commands::Cache(CacheCommand::Clear)) => {
            commands::clear_cache(&config, stdout.lock())?;
        },
        Some(Commands::Cache(CacheCommand::Path)) => {
            commands::print_cache_path(&config, stdout.lock())?;
        },
        Some(Commands::Config) => {
            commands::print_config(&config, stdout.lock())?;
        },
    }

    Ok(())
}
