//! idlesweep - Idle-session shutdown monitor
//!
//! Terminates managed-workspace sessions left idle past a configured
//! threshold, either on a schedule (full-fleet scan) or in response to an
//! idle-metric alarm.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("idlesweep=info".parse()?)
                .add_directive("idlesweep_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;

    // Execute command
    match cli.command {
        Commands::Sweep { json } => commands::sweep::execute(json, &config).await,
        Commands::Alarm { event, json } => commands::alarm::execute(&event, json, &config).await,
        Commands::Run { interval } => commands::run::execute(interval, &config).await,
        Commands::Version => {
            println!("idlesweep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
