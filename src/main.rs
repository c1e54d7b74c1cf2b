//! Perp Gateway - Entry Point
//!
//! 1. Loads `.env` and configuration from the environment
//! 2. Builds the Hyperliquid and Paradex clients that are configured
//! 3. Serves the HTTP API until interrupted

use tokio::signal;
use tracing::{error, info};

use perp_gateway::config::AppConfig;
use perp_gateway::core::init_logging;
use perp_gateway::server::{start_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    init_logging();

    info!("Perp gateway starting");

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Configuration failed");
            return Err(e.into());
        }
    };

    info!(
        port = config.port,
        testnet = config.testnet,
        hyperliquid = config.hyperliquid.is_some(),
        paradex = config.paradex.is_some(),
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;

    tokio::select! {
        result = start_server(state, config.port) => {
            if let Err(e) = result {
                error!(error = %e, "Server stopped with error");
                return Err(e.into());
            }
            Ok(())
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    }
}
