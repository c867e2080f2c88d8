use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    services::session,
    state::AppState,
};

/// A middleware that requires a valid session token on API routes.
///
/// The decoded claims are injected as a request extension for handlers.
/// Every failure mode (no cookie, bad signature, expired token) is a 401;
/// token problems never escape as 500s.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an `AppError`.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let claims = session::from_cookies(&state.config.session_secret, &cookies)
        .ok_or_else(|| {
            tracing::debug!("❌ Missing or invalid session cookie");
            AppError::Authentication("Unauthorized".to_string())
        })?;

    tracing::debug!("✅ User authenticated: {}", claims.user_id);

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
