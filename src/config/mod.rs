//! Configuration module
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `ParadexSettings`)
//! - Application constants with environment variable overrides

pub mod constants;
mod types;

// Re-export types
pub use types::{AppConfig, ParadexSettings};
