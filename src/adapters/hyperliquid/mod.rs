//! Hyperliquid exchange adapter module
//!
//! REST reads via `/info` and EIP-712 signed actions via `/exchange`.

pub mod client;
pub mod config;
pub mod signing;
pub mod types;

pub use client::HyperliquidClient;
pub use config::HyperliquidConfig;
