//! SQLite-backed prompt history
use crate::error::{Error, Result};
use crate::migration::MigrationManager;
use crate::record::{HistoryRecord, HistoryStore, RecordId};
use crate::schema::TIMESTAMP_FORMAT;

use chrono::NaiveDateTime;
use palaver_core::Role;
use rusqlite::params;
use std::path::Path;
use std::sync::Arc;
use tokio_rusqlite::Connection;
use tracing::instrument;

/// Raw row as read from the `prompts` table
struct PromptRow {
    id: i64,
    role: String,
    prompt: String,
    response: String,
    created_at: String,
}

impl TryFrom<PromptRow> for HistoryRecord {
    type Error = Error;

    fn try_from(row: PromptRow) -> Result<Self> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| Error::invalid_record(format!("id={}: {e}", row.id)))?;
        let created_at = NaiveDateTime::parse_from_str(&row.created_at, TIMESTAMP_FORMAT)
            .map_err(|e| Error::invalid_record(format!("id={}: bad created_at {:?}: {e}", row.id, row.created_at)))?
            .and_utc();

        Ok(HistoryRecord { id: RecordId(row.id), role, prompt: row.prompt, response: row.response, created_at })
    }
}

/// A handle to the history database
///
/// The schema is created on open; dropping the last clone closes the
/// connection.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    conn: Arc<Connection>,
}

impl SqliteHistoryStore {
    /// Open or create the history database at the given path
    #[instrument(skip_all, fields(db_path = %db_path.display()))]
    pub async fn open(db_path: &Path) -> Result<Self> {
        tracing::info!("Opening history store at {}", db_path.display());

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)
            .await
            .map_err(|e| Error::database(format!("Failed to open database: {e}")))?;

        Self::from_connection(conn).await
    }

    /// Throwaway database that lives as long as the handle
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::database(format!("Failed to open database: {e}")))?;

        Self::from_connection(conn).await
    }

    async fn from_connection(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            MigrationManager::migrate(conn).map_err(|e| rusqlite::Error::ToSqlConversionFailure(e.to_string().into()))?;
            Ok::<(), rusqlite::Error>(())
        })
        .await
        .map_err(|e| Error::database(format!("Migration failed: {e}")))?;

        tracing::debug!("History store ready");
        Ok(Self { conn: Arc::new(conn) })
    }
}

#[async_trait::async_trait]
impl HistoryStore for SqliteHistoryStore {
    #[instrument(skip(self, prompt, response), fields(role = %role))]
    async fn insert(&self, role: Role, prompt: &str, response: &str) -> Result<RecordId> {
        let role = role.as_str();
        let prompt = prompt.to_owned();
        let response = response.to_owned();

        let id = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached("INSERT INTO prompts (role, prompt, response) VALUES (?1, ?2, ?3)")?;
                stmt.execute(params![role, &prompt, &response])?;
                Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
            })
            .await?;

        tracing::debug!(id, "history record inserted");
        Ok(RecordId(id))
    }

    #[instrument(skip(self))]
    async fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, role, prompt, response, created_at FROM prompts ORDER BY created_at DESC, id DESC",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(PromptRow {
                            id: row.get(0)?,
                            role: row.get(1)?,
                            prompt: row.get(2)?,
                            response: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(rows)
            })
            .await?;

        let records = rows.into_iter().map(HistoryRecord::try_from).collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = records.len(), "history read");
        Ok(records)
    }
}
