mod config;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use api::{ApiConfig, AppState, Forwarder};
use authz::{DecisionEngine, MemoryPolicyEngine};
use directory::StaticDirectory;
use session::{Authenticator, MemorySessionStore, TokenVerifier};
use tracing::info;

use crate::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    let _log_guard = logging::init_logging(&config.log_dir)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    info!("=== Relay gateway starting ===");

    let directory = StaticDirectory::from_file(&config.directory_path).with_context(|| {
        format!(
            "failed to load application directory from {}",
            config.directory_path.display()
        )
    })?;

    let state = AppState {
        directory: Arc::new(directory),
        authenticator: Authenticator::new(
            TokenVerifier::new(&config.token_secret),
            Arc::new(MemorySessionStore::new()),
        ),
        decisions: DecisionEngine::new(Arc::new(MemoryPolicyEngine::new())),
        forwarder: Forwarder::new(std::time::Duration::from_secs(
            config.upstream_timeout_secs,
        ))
        .map_err(|e| anyhow::anyhow!("failed to build forwarder: {e}"))?,
    };

    let api_config = ApiConfig::new()
        .with_port(config.port)
        .with_upstream_timeout(config.upstream_timeout_secs);

    api::start_server(state, api_config)
        .await
        .map_err(|e| anyhow::anyhow!("gateway server error: {e}"))?;

    Ok(())
}
