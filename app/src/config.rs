use std::path::PathBuf;

use anyhow::{bail, Result};

/// Gateway configuration loaded from environment variables (optionally
/// via a `.env` file).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Port to listen on (`RELAY_PORT`, default 3030).
    pub port: u16,
    /// JSON file with the application records (`RELAY_DIRECTORY_PATH`).
    pub directory_path: PathBuf,
    /// Shared secret for verifying bearer tokens (`RELAY_TOKEN_SECRET`).
    pub token_secret: String,
    /// Total timeout for one upstream call (`RELAY_UPSTREAM_TIMEOUT_SECS`,
    /// default 30).
    pub upstream_timeout_secs: u64,
    /// Directory for rolling log files (`RELAY_LOG_DIR`, default
    /// `./data/logs`).
    pub log_dir: PathBuf,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let port = match std::env::var("RELAY_PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => 3030,
        };

        let directory_path = std::env::var("RELAY_DIRECTORY_PATH")
            .unwrap_or_else(|_| "./config/applications.json".to_string())
            .into();

        let Ok(token_secret) = std::env::var("RELAY_TOKEN_SECRET") else {
            bail!("RELAY_TOKEN_SECRET must be set");
        };
        if token_secret.trim().is_empty() {
            bail!("RELAY_TOKEN_SECRET must not be empty");
        }

        let upstream_timeout_secs = match std::env::var("RELAY_UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse()?,
            Err(_) => 30,
        };

        let log_dir = std::env::var("RELAY_LOG_DIR")
            .unwrap_or_else(|_| "./data/logs".to_string())
            .into();

        Ok(Self {
            port,
            directory_path,
            token_secret,
            upstream_timeout_secs,
            log_dir,
        })
    }
}
