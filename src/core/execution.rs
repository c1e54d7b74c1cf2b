//! Hyperliquid Trading Service
//!
//! Opens and closes a position in a single coin with IOC limit orders.
//!
//! # Flow
//! - open: price → size → slippage bound → asset id → leverage → IOC buy
//! - close: signed size → opposite-side reduce-only IOC for `|szi|`
//!
//! Failures inside open/close are returned as a `TradeResult` with
//! `success: false`; nothing is retried.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::hyperliquid::types::{
    round_price, round_price_down, round_size, ClearinghouseState, OpenOrder, OrderWire,
};
use crate::adapters::traits::ExchangeApi;
use crate::core::sizing::{
    calculate_position_size, close_limit_price, max_acceptable_price, validate_slippage,
};

/// Decimals shown for sizes in trade results
const DISPLAY_SIZE_DECIMALS: u32 = 4;

// =============================================================================
// Types
// =============================================================================

/// Outcome of an open/close request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TradeResult {
    fn ok(message: String, data: Value) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
            error: None,
        }
    }

    fn failure(message: &str, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
            error,
        }
    }
}

// =============================================================================
// HyperliquidTradingService
// =============================================================================

/// Trading operations for one coin on one account
#[derive(Clone)]
pub struct HyperliquidTradingService {
    exchange: Arc<dyn ExchangeApi>,
    coin: String,
}

impl HyperliquidTradingService {
    pub fn new(exchange: Arc<dyn ExchangeApi>, coin: impl Into<String>) -> Self {
        Self {
            exchange,
            coin: coin.into(),
        }
    }

    pub fn coin(&self) -> &str {
        &self.coin
    }

    /// Best bid of the tracked coin
    pub async fn get_current_price(&self) -> ExchangeResult<Decimal> {
        self.get_bid_ask().await.map(|(bid, _)| bid)
    }

    /// Best bid and, when quoted, best ask from a single book snapshot
    pub async fn get_bid_ask(&self) -> ExchangeResult<(Decimal, Option<Decimal>)> {
        let book = self.exchange.l2_book(&self.coin).await?;
        let bid = book
            .best_bid()?
            .ok_or_else(|| ExchangeError::InvalidResponse("Unable to fetch current price".into()))?;
        Ok((bid, book.best_ask()?))
    }

    pub async fn get_account_state(&self) -> ExchangeResult<ClearinghouseState> {
        self.exchange.clearinghouse_state().await
    }

    pub async fn get_open_orders(&self) -> ExchangeResult<Vec<OpenOrder>> {
        self.exchange.open_orders().await
    }

    /// Size in coins: `(margin × leverage) ÷ price`
    pub fn calculate_position_size(
        &self,
        margin: Decimal,
        price: Decimal,
        leverage: u32,
    ) -> ExchangeResult<Decimal> {
        calculate_position_size(margin, price, leverage)
    }

    /// Open a long with `margin` USDC at `leverage`, paying at most
    /// `slippage_pct` percent above the current price
    pub async fn open_long_position(
        &self,
        margin: Decimal,
        leverage: u32,
        slippage_pct: Decimal,
    ) -> TradeResult {
        info!(
            coin = %self.coin,
            margin = %margin,
            leverage,
            slippage_pct = %slippage_pct,
            "Opening long position"
        );

        match self.try_open_long(margin, leverage, slippage_pct).await {
            Ok(result) => result,
            Err(e) => {
                error!(coin = %self.coin, error = %e, "Failed to open long position");
                TradeResult::failure("Failed to open long position", Some(e.to_string()))
            }
        }
    }

    async fn try_open_long(
        &self,
        margin: Decimal,
        leverage: u32,
        slippage_pct: Decimal,
    ) -> ExchangeResult<TradeResult> {
        validate_slippage(slippage_pct)?;

        let price = self.get_current_price().await?;
        let size = calculate_position_size(margin, price, leverage)?;
        let max_price = max_acceptable_price(price, slippage_pct)?;
        let asset = self.exchange.asset_info(&self.coin).await?;

        let order_size = round_size(size, asset.sz_decimals);
        if order_size.is_zero() {
            return Err(ExchangeError::InvalidOrder(format!(
                "position size {} rounds to zero at {} decimals",
                size, asset.sz_decimals
            )));
        }
        let limit_px = round_price_down(max_price, asset.sz_decimals);

        info!(
            coin = %self.coin,
            price = %price,
            size = %order_size,
            max_price = %limit_px,
            asset = asset.asset,
            "Position sized"
        );

        self.exchange.update_leverage(asset.asset, leverage, true).await?;

        let order = OrderWire::ioc(asset.asset, true, limit_px, order_size, false);
        let order_result = self.exchange.place_order(order).await?;

        let display_size = size.round_dp(DISPLAY_SIZE_DECIMALS);
        info!(coin = %self.coin, size = %display_size, "Long position opened");

        Ok(TradeResult::ok(
            format!("Successfully opened long position: {} {}", display_size, self.coin),
            json!({
                "positionSize": display_size.to_string(),
                "entryPrice": price.to_string(),
                "maxPrice": limit_px.to_string(),
                "usdcAmount": margin.to_string(),
                "leverage": leverage,
                "orderResult": order_result,
            }),
        ))
    }

    /// Close the whole position in the tracked coin
    pub async fn close_position(&self) -> TradeResult {
        info!(coin = %self.coin, "Closing position");

        match self.try_close().await {
            Ok(result) => result,
            Err(e) => {
                error!(coin = %self.coin, error = %e, "Failed to close position");
                TradeResult::failure("Failed to close position", Some(e.to_string()))
            }
        }
    }

    async fn try_close(&self) -> ExchangeResult<TradeResult> {
        let state = self.exchange.clearinghouse_state().await?;
        let szi = match state.signed_size(&self.coin)? {
            Some(szi) if !szi.is_zero() => szi,
            _ => {
                warn!(coin = %self.coin, "No open position found");
                return Ok(TradeResult::failure("No open position found", None));
            }
        };

        let is_long = szi > Decimal::ZERO;
        let position_size = szi.abs();
        let price = self.get_current_price().await?;
        let asset = self.exchange.asset_info(&self.coin).await?;
        let limit_px = round_price(close_limit_price(price, is_long)?, asset.sz_decimals);

        // Sell to close a long, buy to close a short
        let order = OrderWire::ioc(asset.asset, !is_long, limit_px, position_size, true);
        let order_result = self.exchange.place_order(order).await?;

        info!(coin = %self.coin, size = %position_size, is_long, "Position closed");

        Ok(TradeResult::ok(
            format!("Successfully closed position: {} {}", position_size.normalize(), self.coin),
            json!({
                "positionSize": position_size.normalize().to_string(),
                "side": if is_long { "long" } else { "short" },
                "exitPrice": price.to_string(),
                "limitPrice": limit_px.to_string(),
                "orderResult": order_result,
            }),
        ))
    }
}
