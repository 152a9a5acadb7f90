//! CLI argument definitions using clap derive macros.
//!
//! One subcommand per invocation shape: `sweep` for the scheduled full-fleet
//! scan, `alarm` for the metric-triggered check, `run` for the cron-less
//! interval loop.

use clap::{Parser, Subcommand};

/// Idle-session shutdown monitor
///
/// Terminates workspace sessions that have been idle past a configured
/// threshold.
#[derive(Parser, Debug)]
#[command(name = "idlesweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one full-fleet sweep (scheduled mode; always exits 0)
    Sweep {
        /// Output the sweep report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Handle an alarm-state-change event (metric-triggered mode)
    Alarm {
        /// Path to the event payload, or '-' for stdin
        #[arg(short, long, default_value = "-")]
        event: String,

        /// Output the sweep report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Run continuously, sweeping the fleet on a fixed interval
    Run {
        /// Seconds between sweeps (defaults to [run].interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show version
    Version,
}
