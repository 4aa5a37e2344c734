use serde::{Deserialize, Serialize};

/// A stored data record.
///
/// `timestamp` is the text SQLite writes for `CURRENT_TIMESTAMP`
/// (`YYYY-MM-DD HH:MM:SS`, UTC) and is never modified after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub value: String,
    pub timestamp: String,
}
