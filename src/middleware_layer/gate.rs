use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{services::session, state::AppState};

/// Pages that require a session.
const PROTECTED_PATHS: &[&str] = &["/dashboard", "/dashboard/history", "/icd", "/icd/add"];
/// Pages only shown to unauthenticated visitors.
const PUBLIC_ONLY_PATHS: &[&str] = &["/login"];

/// How the gate classifies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Only reachable without a session (the login page).
    PublicOnly,
    /// Requires a session (dashboard, reference-data admin).
    Protected,
    /// Everything else passes through unchanged.
    Unrestricted,
}

/// Classifies a request path. Exact matches only, like the page list the
/// frontend routes on.
pub fn classify(path: &str) -> RouteClass {
    if PROTECTED_PATHS.contains(&path) {
        RouteClass::Protected
    } else if PUBLIC_ONLY_PATHS.contains(&path) {
        RouteClass::PublicOnly
    } else {
        RouteClass::Unrestricted
    }
}

/// Decides where to send a request, if anywhere.
///
/// Returns the redirect target, or `None` to pass the request through.
pub fn gate_decision(path: &str, authenticated: bool) -> Option<&'static str> {
    if path == "/" {
        return Some(if authenticated { "/dashboard" } else { "/login" });
    }

    match classify(path) {
        RouteClass::Protected if !authenticated => Some("/login"),
        RouteClass::PublicOnly if authenticated => Some("/dashboard"),
        _ => None,
    }
}

/// The page-level access gate, layered over the whole router including the
/// static fallback.
///
/// Token verification can only yield "authenticated" or not; a malformed
/// or expired token is treated as an absent one, never as an error.
pub async fn page_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authenticated =
        session::from_cookies(&state.config.session_secret, &cookies).is_some();

    match gate_decision(&path, authenticated) {
        Some(target) => {
            tracing::debug!("🔀 Gate redirect: {} -> {}", path, target);
            Redirect::to(target).into_response()
        }
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_by_session_presence() {
        assert_eq!(gate_decision("/", true), Some("/dashboard"));
        assert_eq!(gate_decision("/", false), Some("/login"));
    }

    #[test]
    fn protected_pages_require_a_session() {
        for path in ["/dashboard", "/dashboard/history", "/icd", "/icd/add"] {
            assert_eq!(gate_decision(path, false), Some("/login"), "path {}", path);
            assert_eq!(gate_decision(path, true), None, "path {}", path);
        }
    }

    #[test]
    fn login_page_bounces_authenticated_users() {
        assert_eq!(gate_decision("/login", true), Some("/dashboard"));
        assert_eq!(gate_decision("/login", false), None);
    }

    #[test]
    fn everything_else_passes_through() {
        for path in ["/api/icd", "/favicon.ico", "/assets/app.js", "/dashboard/x"] {
            assert_eq!(gate_decision(path, false), None, "path {}", path);
            assert_eq!(gate_decision(path, true), None, "path {}", path);
        }
    }

    #[test]
    fn classification_is_exact_match() {
        assert_eq!(classify("/icd"), RouteClass::Protected);
        assert_eq!(classify("/icd/"), RouteClass::Unrestricted);
        assert_eq!(classify("/login"), RouteClass::PublicOnly);
    }
}
