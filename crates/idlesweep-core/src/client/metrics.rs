//! HTTP client for the idle-duration metrics store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MetricsStore, RetryPolicy};
use crate::error::{Error, Result};
use crate::types::IdleSeriesGroup;

/// Metric name recorded by the workspace platform for user activity.
const IDLE_METRIC: &str = "time_since_last_active";

/// reqwest-backed metrics store client.
#[derive(Clone)]
pub struct MetricsClient {
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

/// Query for the idle series, grouped by structured dimensions.
///
/// The response carries (directory_id, user_id) per group directly; group
/// identity is never reconstructed from a label string.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    metric: &'a str,
    statistic: &'a str,
    directory_id: &'a str,
    period_seconds: u64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    group_by: [&'a str; 2],
    order: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    groups: Vec<IdleSeriesGroup>,
}

impl MetricsClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// Set the bearer token for authentication.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the default retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn post_query(&self, body: &QueryRequest<'_>) -> Result<QueryResponse> {
        let url = format!("{}/api/metrics/query", self.base_url);
        let mut attempt = 0;
        loop {
            match self.send_once(&url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => match self.retry.next_delay(&e, attempt) {
                    Some(delay) => {
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "transient metrics error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    async fn send_once(&self, url: &str, body: &QueryRequest<'_>) -> Result<QueryResponse> {
        debug!(metric = IDLE_METRIC, "metrics query");
        let mut req = self.client.post(url).json(body);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), message));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl MetricsStore for MetricsClient {
    async fn query_idle_series(
        &self,
        directory_id: &str,
        period_seconds: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<IdleSeriesGroup>> {
        let body = QueryRequest {
            metric: IDLE_METRIC,
            statistic: "avg",
            directory_id,
            period_seconds,
            start,
            end,
            group_by: ["directory_id", "user_id"],
            order: "ascending",
        };
        let resp = self.post_query(&body).await?;
        Ok(resp.groups)
    }
}
