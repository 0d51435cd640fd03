use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lens_cli::commands::{inspect, reconcile};
use lens_cli::{Cli, Commands, config, input};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Reconcile {
            files,
            as_source,
            gap_hours,
            buffer_hours,
            floor_hours,
        }) => {
            let mut config =
                config::load(cli.config.as_deref()).context("failed to load configuration")?;
            if let Some(gap) = gap_hours {
                config.gap_threshold_hours = *gap;
            }
            if let Some(buffer) = buffer_hours {
                config.buffer_hours = *buffer;
            }
            if let Some(floor) = floor_hours {
                config.floor_hours = *floor;
            }
            tracing::debug!(?config, "resolved configuration");

            let sources = input::load_documents(files)?;
            reconcile::run(&sources, &config, as_source.as_deref())?;
        }
        Some(Commands::Inspect { files }) => {
            let sources = input::load_documents(files)?;
            inspect::run(&sources)?;
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
