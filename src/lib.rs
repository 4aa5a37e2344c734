//! Record Server Library
//!
//! CRUD HTTP service over a single SQLite table of data records. The modules
//! are exposed for the binary and for end-to-end tests.

pub mod config;
pub mod record_store;
pub mod server;
pub mod sqlite_persistence;

pub use record_store::{Record, RecordStore, SqliteRecordStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
