use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::error::{AppError, Result};
use crate::models::session::SessionClaims;
use crate::models::user::User;

/// The name of the session cookie.
pub const SESSION_COOKIE: &str = "session";
/// The name of the remember-me convenience cookie.
pub const REMEMBER_COOKIE: &str = "remembered_email";

/// Default session lifetime in days.
const SESSION_DAYS: i64 = 1;
/// Session lifetime in days when "remember me" is checked.
const REMEMBER_DAYS: i64 = 30;

/// Signs a session token for the given user.
///
/// # Arguments
///
/// * `secret` - The HMAC signing key.
/// * `user` - The authenticated user.
/// * `remember_me` - Whether to extend the session to 30 days.
///
/// # Returns
///
/// A `Result` containing the compact token and its lifetime in days.
pub fn issue(secret: &[u8], user: &User, remember_me: bool) -> Result<(String, i64)> {
    let days = if remember_me { REMEMBER_DAYS } else { SESSION_DAYS };
    let now = Utc::now();

    let claims = SessionClaims {
        user_id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::days(days)).timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

    Ok((token, days))
}

/// Verifies a session token.
///
/// Any failure mode, missing signature, wrong signature, expired or
/// malformed payload, comes back as `None`. Callers treat that as
/// "unauthenticated", never as an error.
///
/// # Arguments
///
/// * `secret` - The HMAC signing key.
/// * `token` - The compact token from the session cookie.
///
/// # Returns
///
/// The decoded claims, or `None`.
pub fn verify(secret: &[u8], token: &str) -> Option<SessionClaims> {
    let validation = Validation::new(Algorithm::HS256);

    match decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("Session token rejected: {}", e);
            None
        }
    }
}

/// Reads and verifies the session cookie, if any.
pub fn from_cookies(secret: &[u8], cookies: &Cookies) -> Option<SessionClaims> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify(secret, cookie.value()))
}

/// Creates a hardened cookie with the given name, value, and max age.
fn create_secure_cookie(name: &'static str, value: String, max_age_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    let is_production = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");

    cookie
}

/// Stores the session token (and optionally the remembered email) in the
/// response cookies.
pub fn store(cookies: &Cookies, token: String, days: i64, remembered_email: Option<String>) {
    cookies.add(create_secure_cookie(SESSION_COOKIE, token, days));

    if let Some(email) = remembered_email {
        cookies.add(create_secure_cookie(REMEMBER_COOKIE, email, REMEMBER_DAYS));
    }
}

/// Deletes the session cookie and the remember-me side cookie.
pub fn revoke(cookies: &Cookies) {
    for name in [SESSION_COOKIE, REMEMBER_COOKIE] {
        let mut cookie = Cookie::new(name, "");
        cookie.set_max_age(Duration::seconds(0));
        cookie.set_path("/");
        cookies.remove(cookie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Dr. Test".to_string(),
            email: "dr.test@hospital.example.com".to_string(),
            password: "unused".to_string(),
            role: "staff".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips_with_identity_intact() {
        let user = sample_user();
        let (token, days) = issue(SECRET, &user, false).unwrap();
        assert_eq!(days, 1);

        let claims = verify(SECRET, &token).expect("token should verify");
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.name, user.name);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, user.role);
    }

    #[test]
    fn remember_me_extends_the_lifetime_to_thirty_days() {
        let user = sample_user();
        let (token, days) = issue(SECRET, &user, true).unwrap();
        assert_eq!(days, 30);

        let claims = verify(SECRET, &token).unwrap();
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 30 * 86400);
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let user = sample_user();
        let now = Utc::now();
        let claims = SessionClaims {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            iat: (now - chrono::Duration::hours(2)).timestamp() as usize,
            // Well past the default leeway.
            exp: (now - chrono::Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_none());
    }

    #[test]
    fn tampered_token_is_unauthenticated() {
        let user = sample_user();
        let (token, _) = issue(SECRET, &user, false).unwrap();

        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(verify(SECRET, &tampered).is_none());
    }

    #[test]
    fn wrong_secret_is_unauthenticated() {
        let user = sample_user();
        let (token, _) = issue(SECRET, &user, false).unwrap();
        assert!(verify(b"another-32-byte-secret-key......", &token).is_none());
    }

    #[test]
    fn garbage_token_is_unauthenticated() {
        assert!(verify(SECRET, "not.a.token").is_none());
        assert!(verify(SECRET, "").is_none());
    }
}
