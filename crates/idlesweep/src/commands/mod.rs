//! Command implementations.

pub mod alarm;
pub mod run;
pub mod sweep;

use anyhow::Result;
use colored::Colorize;
use idlesweep_core::client::{DirectoryClient, MetricsClient};
use idlesweep_core::{SweepDriver, SweepReport};

use crate::config::Config;

/// Build a sweep driver wired to the configured endpoints.
pub(crate) fn build_driver(
    config: &Config,
) -> Result<SweepDriver<DirectoryClient, MetricsClient>> {
    let retry = config.retry_policy();
    let mut directory =
        DirectoryClient::new(&config.api.directory_url)?.with_retry(retry.clone());
    let mut metrics = MetricsClient::new(&config.api.metrics_url)?.with_retry(retry);
    if let Some(ref key) = config.api.api_key {
        directory = directory.with_token(key.clone());
        metrics = metrics.with_token(key.clone());
    }
    Ok(SweepDriver::new(directory, metrics, config.sweep_config()))
}

/// Print a sweep summary, or the full report as JSON.
pub(crate) fn print_report(report: &SweepReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let id = report.sweep_id.to_string();
    let summary = format!(
        "{} sweep {}: {} examined, {} deleted, {} skipped, {} failed",
        report.mode,
        &id[..8],
        report.examined(),
        report.deleted_count(),
        report.skipped_count(),
        report.failed_count(),
    );
    if report.failed_count() > 0 {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.green());
    }
    Ok(())
}
