use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// Represents a user in the system.
///
/// Users are seeded out of band; this service only ever reads them during
/// login.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's full name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's hashed password (Argon2id).
    pub password: String,
    /// The user's role.
    pub role: String,
    /// Whether the user is active.
    pub is_active: bool,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password: row.get("password"),
            role: row.get("role"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        }
    }
}
