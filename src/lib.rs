//! Perp Gateway
//!
//! HTTP gateway that triggers trades on two perpetual futures exchanges:
//! - Hyperliquid: sized long entry with leverage and slippage bound, position close
//! - Paradex: Starknet-signed onboarding, authentication and order placement

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod server;

pub use error::AppError;
