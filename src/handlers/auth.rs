use std::collections::HashMap;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    services::auth as auth_service,
    services::session,
    state::AppState,
    validation::auth::{validate_email, validate_password},
};

/// The login form payload.
#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Checkbox; the browser sends "on" when checked, nothing otherwise.
    #[serde(rename = "remember-me", default)]
    pub remember_me: Option<String>,
}

/// Per-field validation errors, keyed by form field name.
#[derive(Serialize)]
pub struct FieldErrorsResponse {
    pub success: bool,
    pub errors: HashMap<&'static str, Vec<String>>,
}

/// Strips the error-enum prefix so the form shows just the message.
fn field_message(e: AppError) -> String {
    match e {
        AppError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

/// Handles user login.
///
/// Field-level validation failures come back as 400 with per-field error
/// lists; bad credentials are a single generic 401 with no hint whether
/// the email or the password was wrong.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(payload): Form<LoginForm>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for: {}", payload.email);

    let mut errors: HashMap<&'static str, Vec<String>> = HashMap::new();
    if let Err(e) = validate_email(&payload.email) {
        errors.entry("email").or_default().push(field_message(e));
    }
    if let Err(e) = validate_password(&payload.password) {
        errors.entry("password").or_default().push(field_message(e));
    }

    if !errors.is_empty() {
        let body = FieldErrorsResponse {
            success: false,
            errors,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let email = payload.email.trim();
    let remember_me = payload.remember_me.as_deref() == Some("on");

    let user = auth_service::authenticate_user(&state.db, email, &payload.password).await?;

    let (token, days) = session::issue(&state.config.session_secret, &user, remember_me)?;
    let remembered_email = remember_me.then(|| email.to_string());
    session::store(&cookies, token, days, remembered_email);

    tracing::info!("✅ User logged in: {} ({} day session)", user.id, days);

    Ok(Redirect::to("/dashboard").into_response())
}

/// Handles user logout: drops both cookies and sends the browser back to
/// the login page. Nothing server-side to invalidate.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Response {
    session::revoke(&cookies);
    tracing::info!("👋 User logged out");
    Redirect::to("/login").into_response()
}
