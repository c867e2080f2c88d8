use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A diagnosis-code reference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Icd {
    /// The unique identifier for the record.
    pub id: i32,
    /// The diagnosis code. Unique across the table.
    pub code: String,
    /// The human-readable description of the code.
    pub description: String,
}

impl From<&Row> for Icd {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            code: row.get("code"),
            description: row.get("description"),
        }
    }
}
