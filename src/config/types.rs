//! Configuration types for the gateway
//!
//! `AppConfig` is built once at startup from the environment and shared
//! read-only with every request handler.

use crate::adapters::hyperliquid::config::testnet_from_env;
use crate::adapters::{HyperliquidConfig, ParadexAccount, ParadexSystemConfig};
use crate::error::AppError;

use super::constants::server_port;

/// Env vars that identify a Paradex account
const PARADEX_ACCOUNT_VARS: [&str; 3] = [
    "PARADEX_PRIVATE_KEY",
    "PARADEX_ACCOUNT_ADDRESS",
    "PARADEX_ETHEREUM_ACCOUNT",
];

/// Env vars that identify a Hyperliquid account
const HYPERLIQUID_ACCOUNT_VARS: [&str; 2] = ["PRIVATE_KEY", "WALLET_ADDRESS"];

/// Paradex deployment plus the account trades run for
#[derive(Debug, Clone)]
pub struct ParadexSettings {
    pub system: ParadexSystemConfig,
    pub account: ParadexAccount,
}

/// Root application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,
    /// Testnet flag reported by /health and applied to Hyperliquid
    pub testnet: bool,
    /// `None` when Hyperliquid credentials are absent; its routes answer 503
    pub hyperliquid: Option<HyperliquidConfig>,
    /// `None` when Paradex credentials are absent; its routes answer 503
    pub paradex: Option<ParadexSettings>,
}

fn any_set(vars: &[&str]) -> bool {
    vars.iter().any(|v| std::env::var(v).is_ok())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// An exchange whose variables are all unset is disabled. Partially set
    /// or malformed credentials are a configuration error.
    pub fn from_env() -> Result<Self, AppError> {
        let hyperliquid = if any_set(&HYPERLIQUID_ACCOUNT_VARS) {
            let config = HyperliquidConfig::from_env()
                .map_err(|e| AppError::Config(format!("Hyperliquid: {}", e)))?;
            Some(config)
        } else {
            tracing::warn!("PRIVATE_KEY/WALLET_ADDRESS not set, Hyperliquid routes disabled");
            None
        };

        let paradex = if any_set(&PARADEX_ACCOUNT_VARS) {
            let account = ParadexAccount::from_env()
                .map_err(|e| AppError::Config(format!("Paradex: {}", e)))?;
            Some(ParadexSettings {
                system: ParadexSystemConfig::from_env(),
                account,
            })
        } else {
            tracing::warn!("PARADEX_* credentials not set, Paradex routes disabled");
            None
        };

        let config = Self {
            port: server_port(),
            testnet: testnet_from_env(),
            hyperliquid,
            paradex,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::Config("PORT must be non-zero".into()));
        }

        if let Some(hl) = &self.hyperliquid {
            let address = hl.wallet_address.strip_prefix("0x").unwrap_or("");
            if address.len() != 40 || !address.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AppError::Config(format!(
                    "WALLET_ADDRESS must be a 0x-prefixed 20-byte hex address (got '{}')",
                    hl.wallet_address
                )));
            }
            if hl.coin.trim().is_empty() {
                return Err(AppError::Config("HYPERLIQUID_COIN cannot be empty".into()));
            }
        }

        if let Some(paradex) = &self.paradex {
            if paradex.system.api_base_url.trim().is_empty() {
                return Err(AppError::Config("PARADEX_API_BASE_URL cannot be empty".into()));
            }
            if paradex.system.chain_id.len() > 31 {
                return Err(AppError::Config(format!(
                    "PARADEX_CHAIN_ID must fit in a Cairo short string (got '{}')",
                    paradex.system.chain_id
                )));
            }
        }

        Ok(())
    }
}
