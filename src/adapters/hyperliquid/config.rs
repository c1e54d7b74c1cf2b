//! Hyperliquid Configuration
//!
//! Credentials and endpoint selection for the Hyperliquid REST API.

use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::HTTP_TIMEOUT_SECS;

// =============================================================================
// Constants
// =============================================================================

/// Mainnet REST URL
const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Testnet REST URL
const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Coin traded when `HYPERLIQUID_COIN` is not set
pub const DEFAULT_COIN: &str = "ETH";

// =============================================================================
// Test Constants (well-known Hardhat account #0 - PUBLIC, DO NOT USE IN PROD)
// =============================================================================

#[cfg(test)]
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[cfg(test)]
pub const TEST_WALLET_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Hyperliquid trading client
#[derive(Debug, Clone)]
pub struct HyperliquidConfig {
    /// EVM private key (hex, with or without 0x prefix)
    pub private_key: String,
    /// Account address whose positions and orders are queried
    pub wallet_address: String,
    /// Use testnet endpoints and testnet agent source
    pub testnet: bool,
    /// Coin tracked by the trading service (e.g. "ETH")
    pub coin: String,
    /// Per-call timeout
    pub request_timeout: Duration,
    /// Override for the REST base URL (tests point this at a mock server)
    pub api_url_override: Option<String>,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            wallet_address: String::new(),
            testnet: true,
            coin: DEFAULT_COIN.to_string(),
            request_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            api_url_override: None,
        }
    }
}

impl HyperliquidConfig {
    /// Create configuration from environment variables
    ///
    /// Requires `PRIVATE_KEY` and `WALLET_ADDRESS`. `IS_TESTNET` defaults to
    /// true when unset; `HYPERLIQUID_COIN` defaults to ETH.
    pub fn from_env() -> ExchangeResult<Self> {
        let private_key = std::env::var("PRIVATE_KEY")
            .map_err(|_| ExchangeError::AuthenticationFailed("PRIVATE_KEY not set".into()))?;
        let wallet_address = std::env::var("WALLET_ADDRESS")
            .map_err(|_| ExchangeError::AuthenticationFailed("WALLET_ADDRESS not set".into()))?;
        let testnet = testnet_from_env();
        let coin = std::env::var("HYPERLIQUID_COIN").unwrap_or_else(|_| DEFAULT_COIN.to_string());

        Ok(Self {
            private_key,
            wallet_address,
            testnet,
            coin,
            ..Default::default()
        })
    }

    /// Get REST API base URL
    pub fn api_url(&self) -> &str {
        if let Some(url) = &self.api_url_override {
            return url;
        }
        if self.testnet {
            TESTNET_API_URL
        } else {
            MAINNET_API_URL
        }
    }

    /// Whether signed actions target mainnet
    pub fn is_mainnet(&self) -> bool {
        !self.testnet
    }
}

/// Read `IS_TESTNET`; anything other than an explicit false value means testnet.
pub fn testnet_from_env() -> bool {
    std::env::var("IS_TESTNET")
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_config_default() {
        let config = HyperliquidConfig::default();
        assert!(config.testnet);
        assert_eq!(config.coin, "ETH");
        assert_eq!(config.api_url(), "https://api.hyperliquid-testnet.xyz");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_mainnet_url() {
        let config = HyperliquidConfig {
            testnet: false,
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://api.hyperliquid.xyz");
        assert!(config.is_mainnet());
    }

    #[test]
    fn test_api_url_override() {
        let config = HyperliquidConfig {
            api_url_override: Some("http://127.0.0.1:1234".into()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "http://127.0.0.1:1234");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("PRIVATE_KEY", TEST_PRIVATE_KEY);
        env::set_var("WALLET_ADDRESS", TEST_WALLET_ADDRESS);
        env::set_var("IS_TESTNET", "false");
        env::set_var("HYPERLIQUID_COIN", "BTC");

        let config = HyperliquidConfig::from_env().expect("Should create config");
        assert_eq!(config.wallet_address, TEST_WALLET_ADDRESS);
        assert!(!config.testnet);
        assert_eq!(config.coin, "BTC");

        env::remove_var("PRIVATE_KEY");
        env::remove_var("WALLET_ADDRESS");
        env::remove_var("IS_TESTNET");
        env::remove_var("HYPERLIQUID_COIN");
    }

    #[test]
    #[serial]
    fn test_config_from_env_missing_key() {
        env::remove_var("PRIVATE_KEY");
        env::set_var("WALLET_ADDRESS", TEST_WALLET_ADDRESS);

        let result = HyperliquidConfig::from_env();
        assert!(matches!(result, Err(ExchangeError::AuthenticationFailed(_))));

        env::remove_var("WALLET_ADDRESS");
    }

    #[test]
    #[serial]
    fn test_testnet_defaults_to_true() {
        env::remove_var("IS_TESTNET");
        assert!(testnet_from_env());
        env::set_var("IS_TESTNET", "true");
        assert!(testnet_from_env());
        env::set_var("IS_TESTNET", "FALSE");
        assert!(!testnet_from_env());
        env::remove_var("IS_TESTNET");
    }
}
