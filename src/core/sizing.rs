//! Position sizing and price bounds
//!
//! Exact decimal arithmetic: size = (margin × leverage) ÷ price.

use rust_decimal::Decimal;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Distance from the current price used to price a closing IOC order (0.5%)
pub fn close_slippage_pct() -> Decimal {
    Decimal::new(5, 1)
}

/// Slippage at or above this percentage is refused
pub fn max_slippage_pct() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn overflow(what: &str) -> ExchangeError {
    ExchangeError::InvalidOrder(format!("{} overflow", what))
}

/// Position size in coins for `margin` USDC at `leverage` and `price`
///
/// Computed as `(margin × leverage) ÷ price`. The multiplication is exact; the
/// division is exact whenever the quotient fits in 28 significant digits and
/// otherwise rounded to 28 digits, so any other ordering of the same
/// operations agrees to within one unit in the 28th digit.
pub fn calculate_position_size(
    margin: Decimal,
    price: Decimal,
    leverage: u32,
) -> ExchangeResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(ExchangeError::InvalidOrder(format!("price must be positive, got {}", price)));
    }
    if margin <= Decimal::ZERO {
        return Err(ExchangeError::InvalidOrder(format!("margin must be positive, got {}", margin)));
    }
    if leverage == 0 {
        return Err(ExchangeError::InvalidOrder("leverage must be at least 1".into()));
    }

    let notional = margin
        .checked_mul(Decimal::from(leverage))
        .ok_or_else(|| overflow("notional value"))?;
    notional.checked_div(price).ok_or_else(|| overflow("position size"))
}

/// Accept slippage in `[0, 100)` percent
pub fn validate_slippage(slippage_pct: Decimal) -> ExchangeResult<()> {
    if slippage_pct < Decimal::ZERO || slippage_pct >= max_slippage_pct() {
        return Err(ExchangeError::InvalidOrder(format!(
            "slippage must be at least 0 and below {}%, got {}",
            max_slippage_pct(),
            slippage_pct
        )));
    }
    Ok(())
}

/// Highest price a buy may fill at: `price × (1 + slippage_pct / 100)`
pub fn max_acceptable_price(price: Decimal, slippage_pct: Decimal) -> ExchangeResult<Decimal> {
    validate_slippage(slippage_pct)?;
    let factor = Decimal::ONE + slippage_pct / Decimal::ONE_HUNDRED;
    price.checked_mul(factor).ok_or_else(|| overflow("max price"))
}

/// Limit price of a closing order
///
/// A long is closed by a sell below the current price, a short by a buy above it.
pub fn close_limit_price(price: Decimal, is_long: bool) -> ExchangeResult<Decimal> {
    let offset = close_slippage_pct() / Decimal::ONE_HUNDRED;
    let factor = if is_long {
        Decimal::ONE - offset
    } else {
        Decimal::ONE + offset
    };
    price.checked_mul(factor).ok_or_else(|| overflow("close price"))
}
