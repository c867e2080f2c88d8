use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The HMAC key used to sign session tokens.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// Base URL of the external cost-prediction / classification services.
    pub predict_base_url: String,
    /// Fixed timeout for outbound calls to the prediction services, in
    /// seconds. There is no retry policy: a timed-out call surfaces as an
    /// upstream error.
    pub predict_timeout_secs: u64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut session_secret_hex = env::var("SESSION_SECRET")
            .context("SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?;

        let session_secret_bytes = hex::decode(&session_secret_hex)
            .context("SESSION_SECRET must be valid hexadecimal")?;

        session_secret_hex.zeroize();

        if session_secret_bytes.len() != 32 {
            anyhow::bail!("SESSION_SECRET must be exactly 32 bytes (64 hex characters)");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            session_secret: Zeroizing::new(session_secret_bytes),
            predict_base_url: env::var("PREDICT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5059".to_string()),
            predict_timeout_secs: env::var("PREDICT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("Invalid PREDICT_TIMEOUT_SECS")?,
        })
    }
}
