use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Status code recorded when a probe could not get any HTTP response.
pub const FAILURE_CODE: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub endpoint: String,
    pub code: u16,
    pub timestamp: DateTime<Utc>,
}

impl StatusRecord {
    pub fn new(endpoint: impl Into<String>, code: u16) -> Self {
        Self {
            endpoint: endpoint.into(),
            code,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, FAILURE_CODE)
    }
}

/// Point-in-time copy of the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub records: Vec<StatusRecord>,
}

impl Snapshot {
    pub fn get(&self, endpoint: &str) -> Option<&StatusRecord> {
        self.records.iter().find(|r| r.endpoint == endpoint)
    }
}
