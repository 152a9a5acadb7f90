//! Long-running mode: full-fleet sweeps on a fixed interval.
//!
//! Sweeps are serialized on a single loop, and a PID file keeps a second
//! instance from starting, so at most one sweep is ever in flight.

use anyhow::{bail, Result};
use colored::Colorize;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use super::build_driver;
use crate::config::Config;

pub async fn execute(interval_override: Option<u64>, config: &Config) -> Result<()> {
    let interval_secs = interval_override.unwrap_or(config.run.interval_secs);

    let pid_file = config.pid_file();
    if pid_file.exists() {
        let pid_str = std::fs::read_to_string(&pid_file)?;
        if let Ok(pid) = pid_str.trim().parse::<i32>() {
            if process_exists(pid) {
                bail!("idlesweep already running with PID {}", pid);
            }
        }
        info!("Cleaning up stale PID file from previous crash");
        let _ = std::fs::remove_file(&pid_file);
    }
    if let Some(parent) = pid_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&pid_file, std::process::id().to_string())?;

    println!(
        "{}",
        format!("Sweeping every {}s (Ctrl-C to stop)", interval_secs).cyan()
    );

    let driver = build_driver(config)?;
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match driver.sweep_all().await {
                    Ok(report) => info!(
                        deleted = report.deleted_count(),
                        skipped = report.skipped_count(),
                        failed = report.failed_count(),
                        "sweep finished"
                    ),
                    Err(e) => error!(error = %e, "sweep failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    let _ = std::fs::remove_file(&pid_file);
    Ok(())
}

/// Check if a process exists by PID
fn process_exists(pid: i32) -> bool {
    // On Unix, sending signal 0 checks if process exists
    unsafe { libc::kill(pid, 0) == 0 }
}
