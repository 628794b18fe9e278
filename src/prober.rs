use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::models::StatusRecord;

/// Performs one GET-equivalent request and reports the response status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str, timeout: Duration) -> Result<u16, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, timeout: Duration) -> Result<u16, TransportError> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|_| TransportError::InvalidEndpoint(endpoint.to_string()))?;

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout)
                } else {
                    TransportError::Request(e)
                }
            })?;

        Ok(response.status().as_u16())
    }
}

/// Turns one transport call into a [`StatusRecord`], never an error.
#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Prober {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Resolves no later than the probe timeout, or sooner if `cancel` fires.
    /// Every failure maps to [`FAILURE_CODE`](crate::models::FAILURE_CODE).
    pub async fn probe(&self, endpoint: &str, cancel: &CancellationToken) -> StatusRecord {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.transport.get(endpoint, self.timeout)) => {
                res.unwrap_or(Err(TransportError::Timeout(self.timeout)))
            }
        };

        match outcome {
            Ok(code) => {
                debug!(endpoint, code, "Probe completed");
                StatusRecord::new(endpoint, code)
            }
            Err(e) => {
                warn!(endpoint, error = %e, "Probe failed");
                StatusRecord::failed(endpoint)
            }
        }
    }
}
