use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::models::{Snapshot, StatusRecord};

/// Latest probe result per endpoint, behind one table-wide lock.
///
/// Writers and readers take the same lock, so a snapshot never sees a
/// half-written record. Entries appear on first probe and are never removed.
#[derive(Debug, Default)]
pub struct StatusTable {
    last_results: Mutex<HashMap<String, StatusRecord>>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites whatever was recorded for `record.endpoint`.
    pub async fn write(&self, record: StatusRecord) {
        let mut results = self.last_results.lock().await;
        results.insert(record.endpoint.clone(), record);
    }

    pub async fn snapshot(&self) -> Snapshot {
        let results = self.last_results.lock().await;
        Snapshot {
            taken_at: Utc::now(),
            records: results.values().cloned().collect(),
        }
    }

    pub async fn get(&self, endpoint: &str) -> Option<StatusRecord> {
        self.last_results.lock().await.get(endpoint).cloned()
    }

    pub async fn len(&self) -> usize {
        self.last_results.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
