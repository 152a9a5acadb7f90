//! HTTP client for the session directory service.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{RetryPolicy, SessionDirectory};
use crate::error::{Error, Result};
use crate::types::{SessionKey, SessionPage, SessionStatus};

/// reqwest-backed session directory client.
///
/// Explicitly constructed and passed into the sweep driver; never a global.
#[derive(Clone)]
pub struct DirectoryClient {
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DescribeSessionResponse {
    status: SessionStatus,
}

impl DirectoryClient {
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

    fn session_path(key: &SessionKey) -> String {
        format!(
            "/api/directories/{}/users/{}/sessions/{}/{}",
            key.directory_id, key.user_id, key.session_type, key.session_name
        )
    }

    /// Issue a request, retrying transient failures per the retry policy.
    async fn execute(&self, method: Method, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        loop {
            match self.send_once(&method, &url, path).await {
                Ok(resp) => return Ok(resp),
                Err(e) => match self.retry.next_delay(&e, attempt) {
                    Some(delay) => {
                        warn!(
                            path = path,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "transient directory error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        path: &str,
    ) -> Result<reqwest::Response> {
        debug!("directory request: {} {}", method, path);
        let mut req = self.client.request(method.clone(), url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::SessionNotFound(path.to_string()));
        }
        let message = resp.text().await.unwrap_or_default();
        Err(Error::api(status.as_u16(), message))
    }
}

#[async_trait]
impl SessionDirectory for DirectoryClient {
    async fn list_sessions(
        &self,
        session_type: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SessionPage> {
        let mut path = format!(
            "/api/sessions?session_type={}&page_size={}",
            session_type, page_size
        );
        if let Some(token) = page_token {
            path.push_str(&format!("&page_token={}", token));
        }
        let resp = self.execute(Method::GET, &path).await?;
        Ok(resp.json().await?)
    }

    async fn describe_session(&self, key: &SessionKey) -> Result<SessionStatus> {
        let path = Self::session_path(key);
        let resp = self.execute(Method::GET, &path).await?;
        let body: DescribeSessionResponse = resp.json().await?;
        Ok(body.status)
    }

    async fn delete_session(&self, key: &SessionKey) -> Result<()> {
        let path = Self::session_path(key);
        let _ = self.execute(Method::DELETE, &path).await?;
        Ok(())
    }
}
