use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware::from_fn_with_state,
    extract::DefaultBodyLimit,
};

use http::{Method, header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;

mod models {
    pub mod user;
    pub mod session;
    pub mod icd;
    pub mod prediction;
    pub mod classification;
}

mod repositories {
    pub mod user;
    pub mod icd;
    pub mod prediction;
    pub mod classification;
}

mod services {
    pub mod auth;
    pub mod session;
    pub mod relay;
}

mod handlers {
    pub mod auth;
    pub mod icd;
    pub mod prediction;
    pub mod classification;
    pub mod relay;
}

mod middleware_layer {
    pub mod auth;
    pub mod gate;
}

mod validation {
    pub mod auth;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let login_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    let login_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .layer(tower_governor::GovernorLayer::new(login_governor_conf))
        .with_state(state.clone());

    let logout_routes = Router::new()
        .route("/logout", get(handlers::auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/icd", get(handlers::icd::list))
        .route("/api/icd", post(handlers::icd::create))
        .route("/api/icd/{id}", get(handlers::icd::get))
        .route("/api/icd/{id}", put(handlers::icd::update))
        .route("/api/icd/{id}", delete(handlers::icd::delete))
        .route("/api/prediction/predict", post(handlers::relay::predict))
        .route(
            "/api/prediction/history/save",
            post(handlers::prediction::save),
        )
        .route("/api/prediction/history", get(handlers::prediction::history))
        .route(
            "/api/prediction/detail/{id}",
            get(handlers::prediction::detail),
        )
        .route(
            "/api/classification/save",
            post(handlers::classification::save),
        )
        .route(
            "/api/classification/history",
            get(handlers::classification::history),
        )
        .route(
            "/api/classification/detail/{id}",
            get(handlers::classification::detail),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(login_routes)
        .merge(logout_routes)
        .merge(protected_routes)
        .fallback_service(ServeDir::new("public"))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::gate::page_gate,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
