//! Hyperliquid Types
//!
//! Request/response types for the `/info` and `/exchange` endpoints.
//!
//! Docs: https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api
//!
//! L2 Book format:
//!   levels[0] = Bids (highest to lowest)
//!   levels[1] = Asks (lowest to highest)
//!   Each level: { px: "price", sz: "size", n: count }

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Maximum decimals a perp price may carry before subtracting `szDecimals`
const MAX_PERP_PRICE_DECIMALS: u32 = 6;

/// Significant figures allowed in a non-integer price
const MAX_PRICE_SIG_FIGS: u32 = 5;

/// Decimals kept when converting a number to its wire string
const WIRE_DECIMALS: u32 = 8;

// =============================================================================
// Info Requests
// =============================================================================

/// Body of a POST /info request
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest<'a> {
    L2Book { coin: &'a str },
    ClearinghouseState { user: &'a str },
    OpenOrders { user: &'a str },
    Meta,
}

// =============================================================================
// Info Responses
// =============================================================================

/// A single level in the L2 orderbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price as string
    pub px: String,
    /// Size as string
    pub sz: String,
    /// Number of orders at this level
    pub n: u64,
}

/// L2 book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Book {
    pub coin: String,
    /// [bids, asks]: bids descending, asks ascending
    pub levels: (Vec<BookLevel>, Vec<BookLevel>),
    pub time: u64,
}

impl L2Book {
    /// Best bid price, if the bid side is not empty
    pub fn best_bid(&self) -> ExchangeResult<Option<Decimal>> {
        self.levels.0.first().map(|l| parse_decimal(&l.px, "bid price")).transpose()
    }

    /// Best ask price, if the ask side is not empty
    pub fn best_ask(&self) -> ExchangeResult<Option<Decimal>> {
        self.levels.1.first().map(|l| parse_decimal(&l.px, "ask price")).transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginSummary {
    pub account_value: String,
    pub total_ntl_pos: String,
    pub total_raw_usd: String,
    pub total_margin_used: String,
}

/// Position details inside `assetPositions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
    pub coin: String,
    /// Signed size: positive long, negative short
    pub szi: String,
    #[serde(default)]
    pub entry_px: Option<String>,
    #[serde(default)]
    pub position_value: Option<String>,
    #[serde(default)]
    pub unrealized_pnl: Option<String>,
    #[serde(default)]
    pub liquidation_px: Option<String>,
    #[serde(default)]
    pub margin_used: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPosition {
    pub position: PositionData,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Account margin, positions and balances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearinghouseState {
    #[serde(default)]
    pub asset_positions: Vec<AssetPosition>,
    #[serde(default)]
    pub margin_summary: Option<MarginSummary>,
    #[serde(default)]
    pub cross_margin_summary: Option<MarginSummary>,
    #[serde(default)]
    pub withdrawable: Option<String>,
    #[serde(default)]
    pub time: Option<u64>,
}

impl ClearinghouseState {
    /// Signed position size for `coin`; `None` when no position entry exists
    pub fn signed_size(&self, coin: &str) -> ExchangeResult<Option<Decimal>> {
        self.asset_positions
            .iter()
            .find(|p| p.position.coin == coin)
            .map(|p| parse_decimal(&p.position.szi, "position size"))
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    pub coin: String,
    pub limit_px: String,
    pub oid: u64,
    /// "B" for bids, "A" for asks
    pub side: String,
    pub sz: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMeta {
    pub name: String,
    pub sz_decimals: u32,
    #[serde(default)]
    pub max_leverage: Option<u32>,
}

/// Perpetuals universe returned by `{"type":"meta"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub universe: Vec<AssetMeta>,
}

/// Numeric asset id plus the size precision needed to build orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub asset: u32,
    pub sz_decimals: u32,
}

impl Meta {
    /// Asset id is the coin's index in the universe
    pub fn asset_info(&self, coin: &str) -> Option<AssetInfo> {
        self.universe
            .iter()
            .position(|a| a.name == coin)
            .map(|idx| AssetInfo {
                asset: idx as u32,
                sz_decimals: self.universe[idx].sz_decimals,
            })
    }
}

// =============================================================================
// Exchange Actions (field order is part of the signed payload)
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tif {
    Alo,
    Ioc,
    Gtc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitWire {
    pub tif: Tif,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderTypeWire {
    Limit(LimitWire),
}

/// Single order in the compact wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderWire {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p")]
    pub limit_px: String,
    #[serde(rename = "s")]
    pub sz: String,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: OrderTypeWire,
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

impl OrderWire {
    /// Immediate-or-cancel limit order with a fresh client order id
    pub fn ioc(asset: u32, is_buy: bool, limit_px: Decimal, sz: Decimal, reduce_only: bool) -> Self {
        Self {
            asset,
            is_buy,
            limit_px: float_to_wire(limit_px),
            sz: float_to_wire(sz),
            reduce_only,
            order_type: OrderTypeWire::Limit(LimitWire { tif: Tif::Ioc }),
            cloid: Some(new_cloid()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkOrder {
    pub orders: Vec<OrderWire>,
    pub grouping: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeverage {
    pub asset: u32,
    pub is_cross: bool,
    pub leverage: u32,
}

/// Signed L1 action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Order(BulkOrder),
    UpdateLeverage(UpdateLeverage),
}

impl Action {
    /// Order action with no grouping (`"na"`)
    pub fn order(orders: Vec<OrderWire>) -> Self {
        Action::Order(BulkOrder {
            orders,
            grouping: "na".to_string(),
        })
    }
}

/// ECDSA signature as expected in the exchange payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureWire {
    pub r: String,
    pub s: String,
    pub v: u64,
}

/// Body of a POST /exchange request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload<'a> {
    pub action: &'a Action,
    pub nonce: u64,
    pub signature: SignatureWire,
    pub vault_address: Option<String>,
}

/// Response envelope of POST /exchange
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponse {
    pub status: String,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl ExchangeResponse {
    /// Turn `"err"` envelopes and per-order `{"error": ...}` statuses into errors.
    pub fn into_result(self) -> ExchangeResult<serde_json::Value> {
        if self.status != "ok" {
            let reason = match &self.response {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ExchangeError::OrderRejected(reason));
        }

        let statuses = self
            .response
            .get("data")
            .and_then(|d| d.get("statuses"))
            .and_then(|s| s.as_array());
        if let Some(statuses) = statuses {
            if let Some(msg) = statuses
                .iter()
                .find_map(|s| s.get("error").and_then(|e| e.as_str()))
            {
                return Err(ExchangeError::OrderRejected(msg.to_string()));
            }
        }

        Ok(self.response)
    }
}

// =============================================================================
// Number formatting
// =============================================================================

fn parse_decimal(value: &str, what: &str) -> ExchangeResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid {}: {} ({})", what, value, e)))
}

/// Wire representation: at most 8 decimals, no trailing zeros
pub fn float_to_wire(value: Decimal) -> String {
    let rounded = value.round_dp(WIRE_DECIMALS).normalize();
    if rounded.is_zero() {
        return "0".to_string();
    }
    rounded.to_string()
}

/// Round a perp price to the exchange tick rules
///
/// Integer prices are always valid; otherwise at most 5 significant figures
/// and at most `6 - sz_decimals` decimals.
pub fn round_price(px: Decimal, sz_decimals: u32) -> Decimal {
    round_price_with(px, sz_decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Like `round_price`, but never rounds up. Used for limit prices that must
/// stay within a bound.
pub fn round_price_down(px: Decimal, sz_decimals: u32) -> Decimal {
    round_price_with(px, sz_decimals, RoundingStrategy::ToZero)
}

fn round_price_with(px: Decimal, sz_decimals: u32, strategy: RoundingStrategy) -> Decimal {
    let max_decimals = MAX_PERP_PRICE_DECIMALS.saturating_sub(sz_decimals);
    if px.abs() >= Decimal::from(100_000) {
        return px.round_dp_with_strategy(0, strategy);
    }
    px.round_sf_with_strategy(MAX_PRICE_SIG_FIGS, strategy)
        .unwrap_or(px)
        .round_dp_with_strategy(max_decimals, strategy)
        .normalize()
}

/// Round an order size down to the asset's size precision
pub fn round_size(sz: Decimal, sz_decimals: u32) -> Decimal {
    sz.round_dp_with_strategy(sz_decimals, RoundingStrategy::ToZero)
        .normalize()
}

/// Client order id: `0x` followed by 32 hex characters
pub fn new_cloid() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}
