//! Core module - trading services, sizing, logging
//!
//! This module uses explicit re-exports instead of glob exports.
//!
//! ## Usage
//! ```ignore
//! use crate::core::{HyperliquidTradingService, run_paradex_trade};
//! ```

pub mod execution;
pub mod logging;
pub mod paradex_flow;
pub mod sizing;

// Explicit re-exports for execution module
pub use execution::{HyperliquidTradingService, TradeResult};

// Explicit re-exports for logging module
pub use logging::{
    init_logging, init_logging_with_config, sanitize_signature, LogFormat, LoggingConfig,
    SanitizedValue, DEFAULT_LOG_LEVEL,
};

// Explicit re-exports for paradex_flow module
pub use paradex_flow::{
    cancel_all_orders, run_paradex_trade, FlowReport, FlowStep, StepOutcome, StepStatus,
};

// Explicit re-exports for sizing module
pub use sizing::{
    calculate_position_size, close_limit_price, max_acceptable_price, validate_slippage,
};
