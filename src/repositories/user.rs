use deadpool_postgres::Pool;

use crate::error::Result;
use crate::models::user::User;

/// Finds an active user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, name, email, password, role, is_active, created_at
            FROM users
            WHERE email = $1 AND is_active = true
            "#,
            &[&email],
        )
        .await?;
    Ok(row.as_ref().map(User::from))
}
