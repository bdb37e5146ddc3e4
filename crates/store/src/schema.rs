//! SQLite schema for the prompt history

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create the schema version table
pub const SCHEMA_VERSION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// One row per completed exchange. Rows are only ever inserted.
pub const PROMPTS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS prompts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    role TEXT NOT NULL,
    prompt TEXT NOT NULL,
    response TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prompts_created_at
ON prompts(created_at);
"#;

/// Format of `created_at` as written by `datetime('now')`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
