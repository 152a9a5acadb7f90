//! API clients for the session directory and metrics store.
//!
//! The traits are the injection seam: sweep drivers accept any implementation,
//! production code wires in the reqwest-backed clients below, tests wire in
//! fakes. There are no shared global client handles.

mod directory;
mod metrics;
mod retry;

pub use directory::DirectoryClient;
pub use metrics::MetricsClient;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{IdleSeriesGroup, SessionKey, SessionPage, SessionStatus};

/// Read/delete access to the session directory service.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// List one page of sessions of the given type.
    async fn list_sessions(
        &self,
        session_type: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SessionPage>;

    /// Fetch the current status of a single session.
    async fn describe_session(&self, key: &SessionKey) -> Result<SessionStatus>;

    /// Request deletion of a session.
    async fn delete_session(&self, key: &SessionKey) -> Result<()>;
}

/// Read access to the idle-duration metric store.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Query the idle-duration series for a directory, grouped per
    /// (directory, user), aggregated over `period_seconds` windows, samples
    /// ordered by timestamp ascending.
    async fn query_idle_series(
        &self,
        directory_id: &str,
        period_seconds: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<IdleSeriesGroup>>;
}
