//! Schema migrations for the history database
//!
//! Tracks applied versions in `schema_version` and applies pending ones.

use crate::error::{Error, Result};
use crate::schema::{PROMPTS_SQL, SCHEMA_VERSION, SCHEMA_VERSION_SQL};
use rusqlite::{Connection, params};
use tracing::{debug, info, trace};

pub struct MigrationManager;

impl MigrationManager {
    /// Current schema version, 0 for a fresh database
    pub fn get_current_version(conn: &Connection) -> Result<i32> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(format!("Failed to check schema_version table: {e}")))?;

        if !table_exists {
            trace!("schema_version table does not exist, returning version 0");
            return Ok(0);
        }

        let version: Option<i32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("Failed to query schema version: {e}")))?;

        Ok(version.unwrap_or(0))
    }

    /// Apply pending migrations up to SCHEMA_VERSION. Safe to run repeatedly.
    pub fn migrate(conn: &Connection) -> Result<()> {
        let current_version = Self::get_current_version(conn)?;
        debug!(current_version, target = SCHEMA_VERSION, "checking history schema");

        if current_version >= SCHEMA_VERSION {
            trace!("Schema is up to date, no migration needed");
            return Ok(());
        }

        info!("Migrating history schema from version {} to {}", current_version, SCHEMA_VERSION);

        if current_version == 0 {
            Self::apply_v1_migration(conn)?;
        }

        Ok(())
    }

    fn apply_v1_migration(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_VERSION_SQL)
            .map_err(|e| Error::database(format!("Failed to create schema_version: {e}")))?;
        conn.execute_batch(PROMPTS_SQL)
            .map_err(|e| Error::database(format!("Failed to apply v1 schema: {e}")))?;
        conn.execute("INSERT OR IGNORE INTO schema_version (version) VALUES (?1)", params![1])
            .map_err(|e| Error::database(format!("Failed to record schema version: {e}")))?;

        trace!("v1 migration applied successfully");
        Ok(())
    }
}
