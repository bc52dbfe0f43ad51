//! Binary entrypoint for the leadflow API server.

use std::sync::Arc;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use leadflow::provider::{HttpProvider, ProviderConfig};
use leadflow_server::backend::{FixtureBackend, LiveBackend, ResearchBackend};
use leadflow_server::config::{BackendMode, ServerConfig, FIXTURE_PATH_VAR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("loading server configuration")?;

    let backend: Arc<dyn ResearchBackend> = match config.mode {
        BackendMode::Live => {
            let provider_config =
                ProviderConfig::from_env().context("loading provider configuration")?;
            let provider = Arc::new(
                HttpProvider::new(provider_config).context("building provider client")?,
            );
            Arc::new(LiveBackend::new(provider).context("assembling pipeline")?)
        }
        BackendMode::Fixture => {
            let path = config
                .fixture_path
                .clone()
                .with_context(|| format!("{FIXTURE_PATH_VAR} must be set in fixture mode"))?;
            Arc::new(FixtureBackend::new(path))
        }
    };

    leadflow_server::run(&config.addr, backend)
        .await
        .context("serving requests")
}
