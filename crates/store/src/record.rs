//! The stored exchange and the capability the session writes through.

use chrono::{DateTime, Utc};
use palaver_core::Role;
use std::fmt;

use crate::error::Result;

/// Opaque identifier assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One persisted prompt/response exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: RecordId,
    /// Role of the prompting turn
    pub role: Role,
    pub prompt: String,
    /// May be empty
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only persistence of completed exchanges.
///
/// There is no update or delete. `read_all` returns the most recent record
/// first and reflects every insert that completed before it was called.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, role: Role, prompt: &str, response: &str) -> Result<RecordId>;

    async fn read_all(&self) -> Result<Vec<HistoryRecord>>;
}
