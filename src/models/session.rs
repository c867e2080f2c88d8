use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the signed session token.
///
/// The token is the sole holder of authentication state: there is no
/// server-side session table, so a session cannot be revoked before its
/// natural expiry except by rotating the signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's role.
    pub role: String,
    /// Issued-at, as a Unix timestamp in seconds.
    pub iat: usize,
    /// Expiry, as a Unix timestamp in seconds.
    pub exp: usize,
}
