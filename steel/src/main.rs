//! The Steel liquid simulation binary.

use anyhow::Context;
use steel::SteelServer;
use steel_world::SimulationConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = SimulationConfig::default_path();
    let config = SimulationConfig::load_or_create(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    let mut server = SteelServer::new(config);
    let cancel_token = server.cancel_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl-C, shutting down"),
            Err(e) => log::warn!("Failed to listen for Ctrl-C: {e}"),
        }
        cancel_token.cancel();
    });

    server.run().await;
    Ok(())
}
