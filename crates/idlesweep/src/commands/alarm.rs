//! Alarm-triggered sweep (Mode B).
//!
//! Consumes a typed alarm-state-change event and, when the alarm is firing,
//! runs the metric-triggered check. Unexpected errors propagate as a non-zero
//! exit so the invoking scheduler sees the failure.

use std::io::Read;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use idlesweep_core::event::AlarmEvent;
use tracing::info;

use super::{build_driver, print_report};
use crate::config::Config;

pub async fn execute(event_arg: &str, json: bool, config: &Config) -> Result<()> {
    let payload = if event_arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(event_arg)
            .with_context(|| format!("Failed to read event file {}", event_arg))?
    };

    let event = AlarmEvent::parse(&payload)?;
    if !event.is_firing() {
        info!(
            alarm = %event.detail.alarm_name,
            state = ?event.detail.state,
            "alarm not firing, nothing to do"
        );
        println!("{}", "Alarm not in firing state; no sweep.".yellow());
        return Ok(());
    }

    if config.sweep.directory_id.is_empty() {
        bail!("sweep.directory_id must be configured for alarm-triggered sweeps");
    }

    info!(
        region = %event.region,
        alarm = %event.detail.alarm_name,
        "alarm-triggered sweep"
    );
    let driver = build_driver(config)?;
    let report = driver.sweep_triggered().await?;
    print_report(&report, json)
}
