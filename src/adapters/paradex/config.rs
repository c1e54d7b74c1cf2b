//! Paradex Configuration
//!
//! System configuration (endpoint and chain) and the per-run account identity.

use crate::adapters::errors::{ExchangeError, ExchangeResult};

use super::signing::derive_public_key;

// =============================================================================
// Constants
// =============================================================================

/// Testnet REST base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.testnet.paradex.trade/v1";

/// Testnet Starknet chain id (Cairo short string)
pub const DEFAULT_CHAIN_ID: &str = "PRIVATE_SN_POTC_SEPOLIA";

// =============================================================================
// Test Constants (well-known Starknet test keys - PUBLIC, DO NOT USE IN PROD)
// =============================================================================

/// Test private key for Starknet signing (well-known public test key)
#[cfg(test)]
pub const TEST_PRIVATE_KEY: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

/// Test account address
#[cfg(test)]
pub const TEST_ACCOUNT_ADDRESS: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

/// Test L1 address (Hardhat account #0)
#[cfg(test)]
pub const TEST_ETHEREUM_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

// =============================================================================
// System Configuration
// =============================================================================

/// Endpoint and chain every Paradex call and signature is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParadexSystemConfig {
    /// REST base URL including the version segment (e.g. ".../v1")
    pub api_base_url: String,
    /// Starknet chain id as a Cairo short string
    pub chain_id: String,
}

impl Default for ParadexSystemConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
        }
    }
}

impl ParadexSystemConfig {
    /// Read `PARADEX_API_BASE_URL` and `PARADEX_CHAIN_ID`, falling back to testnet
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("PARADEX_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let chain_id =
            std::env::var("PARADEX_CHAIN_ID").unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string());

        Self {
            api_base_url,
            chain_id,
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Starknet account identity used for one trade run
///
/// `jwt_token` is set by a successful authentication and lives only as long
/// as this value.
#[derive(Clone)]
pub struct ParadexAccount {
    /// Starknet account address (hex felt)
    pub address: String,
    /// Starknet public key (hex felt)
    pub public_key: String,
    /// Starknet private key (hex felt)
    pub private_key: String,
    /// L1 Ethereum address that owns the account
    pub ethereum_account: String,
    /// Bearer token from POST /auth
    pub jwt_token: Option<String>,
}

impl std::fmt::Debug for ParadexAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParadexAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("ethereum_account", &self.ethereum_account)
            .field("jwt_token", &self.jwt_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ParadexAccount {
    /// Build an account, deriving the public key from the private key
    pub fn from_private_key(
        private_key: &str,
        address: &str,
        ethereum_account: &str,
    ) -> ExchangeResult<Self> {
        let public_key = derive_public_key(private_key)?;
        Ok(Self {
            address: address.to_string(),
            public_key,
            private_key: private_key.to_string(),
            ethereum_account: ethereum_account.to_string(),
            jwt_token: None,
        })
    }

    /// Create the account from environment variables
    ///
    /// Requires `PARADEX_PRIVATE_KEY`, `PARADEX_ACCOUNT_ADDRESS` and
    /// `PARADEX_ETHEREUM_ACCOUNT`.
    pub fn from_env() -> ExchangeResult<Self> {
        let private_key = std::env::var("PARADEX_PRIVATE_KEY").map_err(|_| {
            ExchangeError::AuthenticationFailed("PARADEX_PRIVATE_KEY not set".into())
        })?;
        let address = std::env::var("PARADEX_ACCOUNT_ADDRESS").map_err(|_| {
            ExchangeError::AuthenticationFailed("PARADEX_ACCOUNT_ADDRESS not set".into())
        })?;
        let ethereum_account = std::env::var("PARADEX_ETHEREUM_ACCOUNT").map_err(|_| {
            ExchangeError::AuthenticationFailed("PARADEX_ETHEREUM_ACCOUNT not set".into())
        })?;

        Self::from_private_key(&private_key, &address, &ethereum_account)
    }

    /// JWT token if authentication succeeded and returned a non-empty token
    pub fn bearer_token(&self) -> ExchangeResult<&str> {
        match self.jwt_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ExchangeError::NotAuthenticated(
                "no JWT token, call authenticate first".into(),
            )),
        }
    }
}
