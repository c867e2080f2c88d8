use crate::error::{AppError, Result};

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is plausible.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() || email.len() > 255 {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    // Not full RFC 5322; just enough to reject obvious garbage before the
    // database lookup.
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_normal_email() {
        assert!(validate_email("staff@hospital.example.com").is_ok());
    }

    #[test]
    fn rejects_garbage_emails() {
        for bad in ["", "no-at-sign", "@nodomain", "user@", "user@tld-without-dot"] {
            assert!(validate_email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(validate_email("  staff@hospital.example.com  ").is_ok());
    }

    #[test]
    fn password_must_be_at_least_eight_characters() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }
}
