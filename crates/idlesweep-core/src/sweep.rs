//! Sweep drivers for the two shutdown modes.
//!
//! Mode A (`sweep_all`): scheduled full-fleet scan. Pages through every
//! session of the monitored type and requests deletion of the active ones.
//! Per-item failures are logged and the sweep continues; the next scheduled
//! run re-attempts whatever is left.
//!
//! Mode B (`sweep_triggered`): alarm-triggered check. Takes the latest idle
//! sample per (directory, user) group, describes the candidates at or over
//! the threshold, and deletes the ones still InService. Unexpected errors
//! abort the remaining loop and propagate: at that point the candidate set
//! has already been pre-filtered by the alarm, so a failure usually means a
//! systemic problem the invoking scheduler should see.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::{MetricsStore, SessionDirectory};
use crate::decision::{decide, idle_exceeds, Decision, SkipReason};
use crate::error::{Error, Result};
use crate::types::SessionKey;

/// How far back the metrics query looks. Only the latest sample per group is
/// used; the window just has to cover at least one aggregation period.
const METRIC_LOOKBACK_HOURS: i64 = 24;

/// Tunables for a sweep. Plain values; the binary's configuration layer
/// produces these.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Idle time (seconds) after which an InService session is terminated.
    pub idle_timeout_secs: u64,
    /// Aggregation window for the metrics query (seconds).
    pub alarm_period_secs: u64,
    /// Session type this monitor manages.
    pub session_type: String,
    /// Session name within each user profile.
    pub session_name: String,
    /// Page size for full-fleet listings, a rate-limit courtesy to the
    /// directory service.
    pub page_size: u32,
    /// Directory scope for the metrics query.
    pub directory_id: String,
}

impl SweepConfig {
    pub fn new(directory_id: impl Into<String>) -> Self {
        Self {
            idle_timeout_secs: 7200,
            alarm_period_secs: 1200,
            session_type: "canvas".to_string(),
            session_name: "default".to_string(),
            page_size: 50,
            directory_id: directory_id.into(),
        }
    }
}

/// Which mode produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    Scheduled,
    Triggered,
}

impl std::fmt::Display for SweepMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepMode::Scheduled => write!(f, "scheduled"),
            SweepMode::Triggered => write!(f, "triggered"),
        }
    }
}

/// What happened to one session during a sweep.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SweepOutcome {
    Deleted { key: SessionKey },
    Skipped { key: SessionKey, reason: SkipReason },
    Failed { key: SessionKey, error: String },
}

/// Summary of one sweep invocation. Ephemeral; logged, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub sweep_id: Uuid,
    pub mode: SweepMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    pub fn examined(&self) -> usize {
        self.outcomes.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SweepOutcome::Deleted { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SweepOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SweepOutcome::Failed { .. }))
            .count()
    }
}

/// Orchestrates sweeps over injected client handles.
///
/// Single-threaded and invocation-scoped: sessions are processed
/// sequentially, and no state survives between invocations.
pub struct SweepDriver<D, M> {
    directory: D,
    metrics: M,
    config: SweepConfig,
}

impl<D: SessionDirectory, M: MetricsStore> SweepDriver<D, M> {
    pub fn new(directory: D, metrics: M, config: SweepConfig) -> Self {
        Self {
            directory,
            metrics,
            config,
        }
    }

    /// Mode A: full-fleet scan.
    ///
    /// Deletes every session of the monitored type that is still active
    /// (Pending or InService). Already-Deleted/Deleting sessions are on
    /// their way out and Failed sessions have nothing running to stop.
    /// Listing errors propagate; per-item delete errors do not.
    pub async fn sweep_all(&self) -> Result<SweepReport> {
        let sweep_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            sweep_id = %sweep_id,
            session_type = %self.config.session_type,
            "starting full-fleet sweep"
        );

        let mut outcomes = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .directory
                .list_sessions(
                    &self.config.session_type,
                    self.config.page_size,
                    page_token.as_deref(),
                )
                .await?;

            for session in page.sessions {
                if session.session_type != self.config.session_type {
                    continue;
                }
                let key = session.key();
                if !session.status.is_active() {
                    debug!(session = %key, status = %session.status, "nothing to stop, skipping");
                    outcomes.push(SweepOutcome::Skipped {
                        key,
                        reason: SkipReason::NotActive {
                            status: session.status,
                        },
                    });
                    continue;
                }
                match self.directory.delete_session(&key).await {
                    Ok(()) => {
                        info!(session = %key, "delete requested");
                        outcomes.push(SweepOutcome::Deleted { key });
                    }
                    Err(Error::SessionNotFound(_)) => {
                        info!(session = %key, "session already gone");
                        outcomes.push(SweepOutcome::Skipped {
                            key,
                            reason: SkipReason::AlreadyGone,
                        });
                    }
                    Err(e) => {
                        warn!(session = %key, error = %e, "delete failed, continuing sweep");
                        outcomes.push(SweepOutcome::Failed {
                            key,
                            error: e.to_string(),
                        });
                    }
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        let report = SweepReport {
            sweep_id,
            mode: SweepMode::Scheduled,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            sweep_id = %sweep_id,
            examined = report.examined(),
            deleted = report.deleted_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "full-fleet sweep finished"
        );
        Ok(report)
    }

    /// Mode B: metric-triggered check.
    ///
    /// One describe call per candidate at or over the threshold; groups below
    /// it never hit the directory service. A session that vanished between
    /// the metric query and the describe/delete is tolerated; any other error
    /// aborts the remaining loop and propagates.
    pub async fn sweep_triggered(&self) -> Result<SweepReport> {
        let sweep_id = Uuid::new_v4();
        let started_at = Utc::now();
        let threshold = self.config.idle_timeout_secs;
        info!(
            sweep_id = %sweep_id,
            directory_id = %self.config.directory_id,
            threshold_secs = threshold,
            "starting triggered sweep"
        );

        let end = Utc::now();
        let start = end - Duration::hours(METRIC_LOOKBACK_HOURS);
        let mut groups = self
            .metrics
            .query_idle_series(
                &self.config.directory_id,
                self.config.alarm_period_secs,
                start,
                end,
            )
            .await?;
        // Stable ordering keeps logs and fail-fast behavior deterministic.
        groups.sort_by(|a, b| (&a.directory_id, &a.user_id).cmp(&(&b.directory_id, &b.user_id)));

        let mut outcomes = Vec::new();
        for group in groups {
            let key = SessionKey {
                directory_id: group.directory_id.clone(),
                user_id: group.user_id.clone(),
                session_type: self.config.session_type.clone(),
                session_name: self.config.session_name.clone(),
            };
            let latest = group.latest().map(|s| s.idle_seconds);

            if !idle_exceeds(latest, threshold) {
                let reason = match latest {
                    None => SkipReason::NoSamples,
                    Some(idle) => SkipReason::BelowThreshold {
                        idle_seconds: idle,
                        threshold_seconds: threshold,
                    },
                };
                debug!(session = %key, idle_seconds = ?latest, "below threshold, skipping");
                outcomes.push(SweepOutcome::Skipped { key, reason });
                continue;
            }

            let status = match self.directory.describe_session(&key).await {
                Ok(status) => status,
                Err(Error::SessionNotFound(_)) => {
                    info!(session = %key, "session already gone");
                    outcomes.push(SweepOutcome::Skipped {
                        key,
                        reason: SkipReason::AlreadyGone,
                    });
                    continue;
                }
                Err(e) => {
                    error!(session = %key, error = %e, "describe failed, aborting triggered sweep");
                    return Err(e);
                }
            };

            match decide(status, latest, threshold) {
                Decision::Terminate => match self.directory.delete_session(&key).await {
                    Ok(()) => {
                        info!(session = %key, idle_seconds = ?latest, "terminating idle session");
                        outcomes.push(SweepOutcome::Deleted { key });
                    }
                    Err(Error::SessionNotFound(_)) => {
                        info!(session = %key, "session vanished before delete");
                        outcomes.push(SweepOutcome::Skipped {
                            key,
                            reason: SkipReason::AlreadyGone,
                        });
                    }
                    Err(e) => {
                        error!(session = %key, error = %e, "delete failed, aborting triggered sweep");
                        return Err(e);
                    }
                },
                Decision::Skip(reason) => {
                    info!(session = %key, status = %status, reason = ?reason, "not terminating");
                    outcomes.push(SweepOutcome::Skipped { key, reason });
                }
            }
        }

        let report = SweepReport {
            sweep_id,
            mode: SweepMode::Triggered,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            sweep_id = %sweep_id,
            examined = report.examined(),
            deleted = report.deleted_count(),
            skipped = report.skipped_count(),
            "triggered sweep finished"
        );
        Ok(report)
    }
}
