//! Configuration management for idlesweep.
//!
//! Configuration is loaded from a TOML file with per-field defaults; the file
//! path can be overridden with the IDLESWEEP_CONFIG environment variable.
//! Values are deployment-supplied, not runtime inputs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use idlesweep_core::client::RetryPolicy;
use idlesweep_core::SweepConfig;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// External API endpoints and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Sweep tunables
    #[serde(default)]
    pub sweep: SweepSection,

    /// Client retry policy
    #[serde(default)]
    pub retry: RetrySection,

    /// Long-running mode settings
    #[serde(default)]
    pub run: RunSection,

    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the session directory service
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Base URL for the metrics store
    #[serde(default = "default_metrics_url")]
    pub metrics_url: String,

    /// Bearer token for both services
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSection {
    /// Idle time (seconds) before an InService session is terminated
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Aggregation window (seconds) for the idle metric query
    #[serde(default = "default_alarm_period")]
    pub alarm_period_secs: u64,

    /// Session type this monitor manages
    #[serde(default = "default_session_type")]
    pub session_type: String,

    /// Session name within each user profile
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Listing page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory scope for metric-triggered sweeps; required for `alarm`
    #[serde(default)]
    pub directory_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySection {
    /// Maximum attempts per client call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Seconds between sweeps in `run` mode
    #[serde(default = "default_run_interval")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for runtime files (PID file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

// Default value functions

fn default_directory_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_metrics_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_idle_timeout() -> u64 {
    7200 // 2 hours
}

fn default_alarm_period() -> u64 {
    1200 // 20 minutes
}

fn default_session_type() -> String {
    "canvas".to_string()
}

fn default_session_name() -> String {
    "default".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_max_attempts() -> u32 {
    10
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    20_000
}

fn default_run_interval() -> u64 {
    300
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "idlesweep", "idlesweep") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".idlesweep")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            metrics_url: default_metrics_url(),
            api_key: None,
        }
    }
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            alarm_period_secs: default_alarm_period(),
            session_type: default_session_type(),
            session_name: default_session_name(),
            page_size: default_page_size(),
            directory_id: String::new(),
        }
    }
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            interval_secs: default_run_interval(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file or defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("IDLESWEEP_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// PID file used by `run` mode to serialize instances.
    pub fn pid_file(&self) -> PathBuf {
        self.paths.data_dir.join("idlesweep.pid")
    }

    /// Plain sweep tunables for the core driver.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            idle_timeout_secs: self.sweep.idle_timeout_secs,
            alarm_period_secs: self.sweep.alarm_period_secs,
            session_type: self.sweep.session_type.clone(),
            session_name: self.sweep.session_name.clone(),
            page_size: self.sweep.page_size,
            directory_id: self.sweep.directory_id.clone(),
        }
    }

    /// Retry policy for the HTTP clients.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            ..RetryPolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.sweep.idle_timeout_secs, 7200);
        assert_eq!(config.sweep.alarm_period_secs, 1200);
        assert_eq!(config.sweep.session_type, "canvas");
        assert_eq!(config.sweep.session_name, "default");
        assert_eq!(config.sweep.page_size, 50);
        assert!(config.sweep.directory_id.is_empty());

        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.run.interval_secs, 300);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[sweep]
idle_timeout_secs = 3600
directory_id = "d-42"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.sweep.idle_timeout_secs, 3600);
        assert_eq!(config.sweep.directory_id, "d-42");
        // Untouched fields fall back to defaults.
        assert_eq!(config.sweep.alarm_period_secs, 1200);
        assert_eq!(config.api.directory_url, "http://localhost:8080");
        assert_eq!(config.retry.max_attempts, 10);
    }

    #[test]
    fn test_load_nonexistent_uses_defaults() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(config.sweep.idle_timeout_secs, 7200);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.sweep.directory_id = "d-7".to_string();
        config.api.api_key = Some("secret".to_string());

        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.sweep.directory_id, "d-7");
        assert_eq!(loaded.api.api_key.as_deref(), Some("secret"));
        assert_eq!(loaded.retry.base_delay_ms, config.retry.base_delay_ms);
    }

    #[test]
    fn test_sweep_config_conversion() {
        let mut config = Config::default();
        config.sweep.directory_id = "d-1".to_string();
        config.sweep.idle_timeout_secs = 1800;

        let sweep = config.sweep_config();
        assert_eq!(sweep.directory_id, "d-1");
        assert_eq!(sweep.idle_timeout_secs, 1800);
        assert_eq!(sweep.session_type, "canvas");
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = Config::default();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.base_delay, Duration::from_millis(200));
        assert_eq!(policy.max_delay, Duration::from_millis(20_000));
    }

    #[test]
    fn test_pid_file_under_data_dir() {
        let config = Config::default();
        assert!(config.pid_file().ends_with("idlesweep.pid"));
        assert!(config.pid_file().starts_with(&config.paths.data_dir));
    }
}
