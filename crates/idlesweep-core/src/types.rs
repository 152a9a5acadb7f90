//! Shared types for idlesweep-core.
//!
//! These types are used by both the API clients and the sweep drivers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Session Types
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a session within the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub directory_id: String,
    pub user_id: String,
    pub session_type: String,
    pub session_name: String,
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} for {} in {}",
            self.session_type, self.session_name, self.user_id, self.directory_id
        )
    }
}

/// Lifecycle status reported by the directory service.
///
/// Observed only: this tool requests a single transition
/// (InService -> Deleting) and never owns the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Pending,
    InService,
    Deleting,
    Deleted,
    Failed,
}

impl SessionStatus {
    /// Whether a full-fleet sweep should request deletion.
    ///
    /// Deleted/Deleting sessions are already on their way out and Failed
    /// sessions have nothing left to stop.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Pending | SessionStatus::InService)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::InService => "InService",
            SessionStatus::Deleting => "Deleting",
            SessionStatus::Deleted => "Deleted",
            SessionStatus::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

/// A session as returned by the directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub directory_id: String,
    pub user_id: String,
    pub session_type: String,
    pub session_name: String,
    pub status: SessionStatus,
}

impl Session {
    pub fn key(&self) -> SessionKey {
        SessionKey {
            directory_id: self.directory_id.clone(),
            user_id: self.user_id.clone(),
            session_type: self.session_type.clone(),
            session_name: self.session_name.clone(),
        }
    }
}

/// One page of a session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPage {
    pub sessions: Vec<Session>,
    pub next_page_token: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Metric Types
// ─────────────────────────────────────────────────────────────────────────────

/// One sample of the idle-duration series.
///
/// `idle_seconds` is fractional because the metrics store averages activity
/// over the aggregation period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleSample {
    pub timestamp: DateTime<Utc>,
    pub idle_seconds: f64,
}

/// The idle series for one (directory, user) group.
///
/// Group identity comes from the query's grouping dimensions; it is never
/// parsed out of a formatted label string. Samples are ordered by timestamp
/// ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleSeriesGroup {
    pub directory_id: String,
    pub user_id: String,
    pub samples: Vec<IdleSample>,
}

impl IdleSeriesGroup {
    /// The most recent sample, the decision input for this group.
    pub fn latest(&self) -> Option<&IdleSample> {
        self.samples.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey {
            directory_id: "d-1".into(),
            user_id: "alice".into(),
            session_type: "canvas".into(),
            session_name: "default".into(),
        }
    }

    #[test]
    fn test_session_key_display() {
        assert_eq!(key().to_string(), "canvas/default for alice in d-1");
    }

    #[test]
    fn test_status_is_active() {
        assert!(SessionStatus::Pending.is_active());
        assert!(SessionStatus::InService.is_active());
        assert!(!SessionStatus::Deleting.is_active());
        assert!(!SessionStatus::Deleted.is_active());
        assert!(!SessionStatus::Failed.is_active());
    }

    #[test]
    fn test_status_serde_names() {
        let status: SessionStatus = serde_json::from_str("\"InService\"").unwrap();
        assert_eq!(status, SessionStatus::InService);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"InService\"");
    }

    #[test]
    fn test_latest_sample() {
        let group = IdleSeriesGroup {
            directory_id: "d-1".into(),
            user_id: "alice".into(),
            samples: vec![
                IdleSample {
                    timestamp: Utc::now(),
                    idle_seconds: 3000.0,
                },
                IdleSample {
                    timestamp: Utc::now(),
                    idle_seconds: 7300.0,
                },
            ],
        };
        assert_eq!(group.latest().unwrap().idle_seconds, 7300.0);

        let empty = IdleSeriesGroup {
            directory_id: "d-1".into(),
            user_id: "bob".into(),
            samples: vec![],
        };
        assert!(empty.latest().is_none());
    }
}
