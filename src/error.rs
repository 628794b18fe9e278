use std::time::Duration;
use thiserror::Error;

/// Why a single probe could not produce an HTTP status.
///
/// These never leave the prober; they are folded into the failure code.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
}

/// Error returned by a task running inside the bounded task group.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
    #[error("task panicked: {0}")]
    Panicked(String),
    #[error("task aborted")]
    Aborted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
