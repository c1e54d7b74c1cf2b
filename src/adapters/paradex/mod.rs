//! Paradex exchange adapter
//!
//! Raw REST calls authenticated with Starknet typed-data signatures.
//!
//! - `config` - System config (endpoint, chain) and account identity
//! - `types` - Order intent and REST payloads
//! - `signing` - SNIP-12 message hashing and signing
//! - `client` - REST client

pub mod client;
pub mod config;
pub mod signing;
pub mod types;

pub use client::ParadexClient;
pub use config::{ParadexAccount, ParadexSystemConfig};
pub use types::{Instruction, OrderIntent, OrderSide, OrderType};
