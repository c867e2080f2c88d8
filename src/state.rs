use deadpool_postgres::Pool;
use std::time::Duration;
use crate::config::Config;
use crate::error::{AppError, Result};

/// The application's state.
///
/// The pool is the only shared resource: handlers acquire a connection,
/// run one statement, and release it. The HTTP client is cheap to clone
/// and carries the fixed outbound timeout.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The HTTP client for the external prediction services.
    pub http: reqwest::Client,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.predict_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        tracing::info!(
            "✅ Outbound HTTP client initialized ({}s timeout, no retry)",
            config.predict_timeout_secs
        );

        Ok(AppState {
            db,
            http,
            config: config.clone(),
        })
    }
}
