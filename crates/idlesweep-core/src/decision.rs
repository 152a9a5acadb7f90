//! Shutdown Decision Engine.
//!
//! Pure logic mapping a session's observed status and latest idle duration to
//! a terminate/skip decision. No I/O happens here; the sweep drivers own all
//! client calls and record the per-session outcomes.

use serde::Serialize;

use crate::types::SessionStatus;

/// Why a session was left alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// The idle series has no samples for this user.
    NoSamples,
    /// The latest idle duration has not reached the threshold.
    BelowThreshold {
        idle_seconds: f64,
        threshold_seconds: u64,
    },
    /// The session is not in a state we are allowed to terminate.
    NotInService {
        status: SessionStatus,
        idle_seconds: f64,
    },
    /// Full-fleet scan: the session is already gone, on its way out, or failed.
    NotActive { status: SessionStatus },
    /// The directory reported the session missing mid-sweep.
    AlreadyGone,
}

/// Outcome of the decision engine for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decision {
    Terminate,
    Skip(SkipReason),
}

/// Inclusive threshold comparison. The single home of the `>=` semantics:
/// an idle duration exactly at the threshold counts as exceeding it.
///
/// `None` means no samples were recorded, which never crosses a threshold.
pub fn idle_exceeds(idle_seconds: Option<f64>, threshold_seconds: u64) -> bool {
    match idle_seconds {
        Some(idle) => idle >= threshold_seconds as f64,
        None => false,
    }
}

/// Decide whether a session should be terminated.
///
/// Returns `Terminate` iff the session is `InService` and its latest idle
/// duration meets the threshold. Everything else is a `Skip` carrying the
/// observed values for the logs.
pub fn decide(
    status: SessionStatus,
    idle_seconds: Option<f64>,
    threshold_seconds: u64,
) -> Decision {
    let Some(idle) = idle_seconds else {
        return Decision::Skip(SkipReason::NoSamples);
    };

    if !idle_exceeds(Some(idle), threshold_seconds) {
        return Decision::Skip(SkipReason::BelowThreshold {
            idle_seconds: idle,
            threshold_seconds,
        });
    }

    if status != SessionStatus::InService {
        return Decision::Skip(SkipReason::NotInService {
            status,
            idle_seconds: idle,
        });
    }

    Decision::Terminate
}
