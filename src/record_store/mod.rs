mod models;
mod schema;
mod sqlite_record_store;

pub use models::Record;
pub use sqlite_record_store::SqliteRecordStore;

use anyhow::Result;
use rusqlite::TransactionBehavior;
use std::time::Duration;

pub trait RecordStore: Send + Sync {
    /// All records, ascending by id.
    fn list_records(&self) -> Result<Vec<Record>>;

    /// Inserts a record and returns the id assigned by the store.
    fn add_record(&self, value: &str) -> Result<i64>;

    /// Replaces the value of record `id`. Returns the number of rows changed,
    /// 0 when no such record exists.
    fn update_record(&self, id: i64, value: &str) -> Result<usize>;

    /// Deletes record `id`. Returns the number of rows removed, 0 when no such
    /// record exists.
    fn delete_record(&self, id: i64) -> Result<usize>;
}

/// How write transactions acquire the database lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TransactionMode {
    Deferred,
    Immediate,
    Exclusive,
}

impl Default for TransactionMode {
    fn default() -> Self {
        Self::Exclusive
    }
}

impl std::fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<TransactionMode> for TransactionBehavior {
    fn from(mode: TransactionMode) -> Self {
        match mode {
            TransactionMode::Deferred => TransactionBehavior::Deferred,
            TransactionMode::Immediate => TransactionBehavior::Immediate,
            TransactionMode::Exclusive => TransactionBehavior::Exclusive,
        }
    }
}

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Clone, Debug)]
pub struct StoreSettings {
    /// How long a connection waits on a locked database before giving up.
    pub busy_timeout: Duration,
    pub transaction_mode: TransactionMode,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            transaction_mode: TransactionMode::default(),
        }
    }
}
