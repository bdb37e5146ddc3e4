//! Session-local history used when persistence is turned off.
use crate::error::Result;
use crate::record::{HistoryRecord, HistoryStore, RecordId};

use chrono::Utc;
use palaver_core::Role;
use tokio::sync::Mutex;

/// History kept in process memory and lost at exit
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert(&self, role: Role, prompt: &str, response: &str) -> Result<RecordId> {
        let mut records = self.records.lock().await;
        let id = RecordId(records.len() as i64 + 1);
        records.push(HistoryRecord {
            id,
            role,
            prompt: prompt.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().cloned().collect())
    }
}
