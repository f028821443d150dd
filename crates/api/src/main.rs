//! Campaign Dashboard - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    init_logging(&config)?;

    info!("=== Campaign Dashboard v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(config).await
}
