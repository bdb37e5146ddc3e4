//! Prompt history persistence
//!
//! Every completed exchange is written once through [`HistoryStore::insert`]
//! and read back newest first for the history browser.
//!
//! # Example
//!
//! ```ignore
//! use palaver_core::Role;
//! use palaver_store::{HistoryStore, SqliteHistoryStore};
//!
//! let store = SqliteHistoryStore::open(&db_path).await?;
//! store.insert(Role::User, "hello", "hi there").await?;
//!
//! for record in store.read_all().await? {
//!     println!("{} {}: {}", record.created_at, record.role, record.prompt);
//! }
//! ```

mod error;
mod history_store;
mod memory_store;
mod migration;
mod record;
mod schema;

pub use error::{Error, Result};
pub use history_store::SqliteHistoryStore;
pub use memory_store::MemoryHistoryStore;
pub use record::{HistoryRecord, HistoryStore, RecordId};
