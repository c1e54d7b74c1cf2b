//! Exchange adapters for Hyperliquid and Paradex
//!
//! Hyperliquid is reached through its `/info` and signed `/exchange`
//! endpoints; Paradex through REST calls authenticated with Starknet
//! signatures and a JWT.

pub mod errors;
pub mod hyperliquid;
pub mod paradex;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use errors::{ExchangeError, ExchangeResult};
pub use hyperliquid::{HyperliquidClient, HyperliquidConfig};
pub use paradex::{OrderIntent, ParadexAccount, ParadexClient, ParadexSystemConfig};
pub use traits::ExchangeApi;
