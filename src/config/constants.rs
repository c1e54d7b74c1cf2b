//! Application constants and configuration defaults
//!
//! Values can be overridden via environment variables.

use rust_decimal::Decimal;

// =============================================================================
// Server
// =============================================================================

/// Listen port when `PORT` is unset or invalid
pub const DEFAULT_PORT: u16 = 3000;

/// HTTP listen port (default: 3000)
///
/// Environment variable: `PORT`
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

// =============================================================================
// Trade Request Defaults
// =============================================================================

/// Margin in USDC when the trade request omits `usdcAmount`
pub fn default_usdc_amount() -> Decimal {
    Decimal::from(500)
}

/// Leverage when the trade request omits `leverage`
pub const DEFAULT_LEVERAGE: u32 = 1;

/// Slippage percentage when the trade request omits `slippage` (0.5%)
pub fn default_slippage_pct() -> Decimal {
    Decimal::new(5, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_port_default_and_override() {
        std::env::remove_var("PORT");
        assert_eq!(server_port(), 3000);

        std::env::set_var("PORT", "8080");
        assert_eq!(server_port(), 8080);

        std::env::set_var("PORT", "not-a-port");
        assert_eq!(server_port(), 3000);

        std::env::remove_var("PORT");
    }

    #[test]
    fn test_trade_defaults() {
        assert_eq!(default_usdc_amount(), Decimal::from(500));
        assert_eq!(default_slippage_pct().to_string(), "0.5");
        assert_eq!(DEFAULT_LEVERAGE, 1);
    }
}
