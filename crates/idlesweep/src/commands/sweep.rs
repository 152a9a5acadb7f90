//! Scheduled full-fleet sweep (Mode A).

use anyhow::Result;
use colored::Colorize;
use tracing::error;

use super::{build_driver, print_report};
use crate::config::Config;

pub async fn execute(json: bool, config: &Config) -> Result<()> {
    let driver = build_driver(config)?;
    match driver.sweep_all().await {
        Ok(report) => print_report(&report, json),
        Err(e) => {
            // Scheduled mode exits clean on failure; the next timer run
            // re-attempts everything.
            error!(error = %e, "scheduled sweep failed");
            println!("{}", format!("⚠ sweep failed: {}", e).yellow());
            Ok(())
        }
    }
}
