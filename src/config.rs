use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::error::ConfigError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorConfig {
    pub sites: Vec<String>,
    #[serde(default = "default_check_interval")]
    pub check_interval_ms: u64,
    #[serde(default = "default_report_interval")]
    pub report_interval_ms: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    #[serde(default)]
    pub api_port: Option<u16>,
}

fn default_check_interval() -> u64 { 5000 }
fn default_report_interval() -> u64 { 1000 }
fn default_max_concurrency() -> usize { 3 }
fn default_probe_timeout() -> u64 { 2000 }

impl MonitorConfig {
    /// Config with default knobs for the given sites.
    pub fn new(sites: Vec<String>, check_interval: Duration) -> Self {
        Self {
            sites,
            check_interval_ms: millis_rounded_up(check_interval),
            report_interval_ms: default_report_interval(),
            max_concurrency: default_max_concurrency(),
            probe_timeout_ms: default_probe_timeout(),
            api_port: None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: MonitorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_ms == 0 {
            return Err(ConfigError::Invalid("check_interval_ms must be positive".into()));
        }
        if self.report_interval_ms == 0 {
            return Err(ConfigError::Invalid("report_interval_ms must be positive".into()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Invalid("probe_timeout_ms must be positive".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be at least 1".into()));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid(format!(
                "max_concurrency must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Whole milliseconds, with any nonzero sub-millisecond remainder counted as 1.
fn millis_rounded_up(d: Duration) -> u64 {
    let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
    if d.subsec_nanos() % 1_000_000 != 0 {
        ms.saturating_add(1)
    } else {
        ms
    }
}
