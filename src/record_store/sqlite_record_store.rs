use super::schema::DATA_TABLE;
use super::{Record, RecordStore, StoreSettings};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// SQLite backed [`RecordStore`].
///
/// No connection is kept open between calls: every operation opens its own
/// connection, runs a single statement and drops the connection when it
/// returns, whether it succeeded or not.
pub struct SqliteRecordStore {
    db_path: PathBuf,
    settings: StoreSettings,
}

impl SqliteRecordStore {
    /// Opens the database at `db_path`, creating the file and the `data` table
    /// if they are missing. Fails if an existing `data` table has a different
    /// shape.
    pub fn new<P: AsRef<Path>>(db_path: P, settings: StoreSettings) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let store = Self { db_path, settings };

        let conn = store.connection()?;
        DATA_TABLE
            .create_if_absent(&conn)
            .context("Failed to create the data table")?;
        DATA_TABLE
            .validate(&conn)
            .with_context(|| format!("Unexpected data table layout in {:?}", store.db_path))?;

        info!(
            "Records database ready at {:?} (busy timeout {}ms, {} transactions)",
            store.db_path,
            store.settings.busy_timeout.as_millis(),
            store.settings.transaction_mode
        );
        Ok(store)
    }

    fn connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open records database at {:?}", self.db_path))?;
        conn.busy_timeout(self.settings.busy_timeout)
            .context("Failed to set busy timeout")?;
        Ok(conn)
    }

    /// Runs `statement` in a transaction with the configured locking mode and
    /// commits it. The transaction rolls back if `statement` fails.
    fn write<T, F>(&self, statement: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> rusqlite::Result<T>,
    {
        let mut conn = self.connection()?;
        let tx = conn
            .transaction_with_behavior(self.settings.transaction_mode.into())
            .context("Failed to begin transaction")?;
        let result = statement(&tx)?;
        tx.commit().context("Failed to commit transaction")?;
        Ok(result)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        Ok(Record {
            id: row.get("id")?,
            value: row.get("value")?,
            timestamp: row.get("timestamp")?,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn list_records(&self) -> Result<Vec<Record>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT id, value, timestamp FROM data ORDER BY id")?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<Record>>>()
            .context("Failed to read records")?;
        Ok(records)
    }

    fn add_record(&self, value: &str) -> Result<i64> {
        let id = self
            .write(|tx| {
                tx.execute("INSERT INTO data (value) VALUES (?1)", params![value])?;
                Ok(tx.last_insert_rowid())
            })
            .context("Failed to insert record")?;
        debug!("Inserted record {}", id);
        Ok(id)
    }

    fn update_record(&self, id: i64, value: &str) -> Result<usize> {
        self.write(|tx| tx.execute("UPDATE data SET value = ?1 WHERE id = ?2", params![value, id]))
            .with_context(|| format!("Failed to update record {}", id))
    }

    fn delete_record(&self, id: i64) -> Result<usize> {
        self.write(|tx| tx.execute("DELETE FROM data WHERE id = ?1", params![id]))
            .with_context(|| format!("Failed to delete record {}", id))
    }
}
