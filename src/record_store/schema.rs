//! SQLite schema for the records database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table};

/// The single table holding every record. AUTOINCREMENT keeps ids from being
/// reused after the newest row is deleted.
pub const DATA_TABLE: Table = Table {
    name: "data",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true),
        sqlite_column!(
            "timestamp",
            &SqlType::Datetime,
            default_value = Some("CURRENT_TIMESTAMP")
        ),
    ],
};
