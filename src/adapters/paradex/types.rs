//! Paradex Types
//!
//! Order intent accepted by the gateway and the REST payloads built from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Decimals carried by signed sizes and prices
pub const QUANTUM_DECIMALS: u32 = 8;

fn check_precision(field: &str, value: Decimal) -> ExchangeResult<()> {
    if value.normalize().scale() > QUANTUM_DECIMALS {
        return Err(ExchangeError::InvalidOrder(format!(
            "{} {} has more than {} decimals",
            field, value, QUANTUM_DECIMALS
        )));
    }
    Ok(())
}

// =============================================================================
// Order Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }

    /// Numeric side used in the signed order: 1 = BUY, 2 = SELL
    pub fn signing_code(&self) -> u64 {
        match self {
            OrderSide::Buy => 1,
            OrderSide::Sell => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
        }
    }
}

/// Time-in-force instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    #[default]
    Gtc,
    Ioc,
    PostOnly,
}

// =============================================================================
// Order Intent
// =============================================================================

/// Order to place on Paradex
///
/// JSON shape: `{"market":"ETH-USD-PERP","side":"SELL","type":"LIMIT",
/// "size":"10","price":"3292.04","instruction":"GTC"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub market: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub size: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub instruction: Instruction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl OrderIntent {
    /// Reject orders the exchange would refuse before spending a signature on them
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.market.is_empty() {
            return Err(ExchangeError::InvalidOrder("market is required".into()));
        }
        if self.size <= Decimal::ZERO {
            return Err(ExchangeError::InvalidOrder(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        check_precision("size", self.size)?;
        if self.order_type == OrderType::Limit {
            match self.price {
                Some(price) if price > Decimal::ZERO => {}
                _ => {
                    return Err(ExchangeError::InvalidOrder(
                        "LIMIT order requires a positive price".into(),
                    ))
                }
            }
            check_precision("price", self.effective_price())?;
        }
        Ok(())
    }

    /// Price that is signed and sent: zero for MARKET orders
    pub fn effective_price(&self) -> Decimal {
        match self.order_type {
            OrderType::Market => Decimal::ZERO,
            OrderType::Limit => self.price.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Body of POST /orders: the intent plus its signature
#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub market: &'a str,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub size: String,
    pub price: String,
    pub instruction: Instruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
    pub signature: String,
    pub signature_timestamp: u64,
}

impl<'a> OrderRequest<'a> {
    pub fn new(intent: &'a OrderIntent, signature: String, signature_timestamp: u64) -> Self {
        Self {
            market: &intent.market,
            side: intent.side,
            order_type: intent.order_type,
            size: intent.size.normalize().to_string(),
            price: intent.effective_price().normalize().to_string(),
            instruction: intent.instruction,
            client_id: intent.client_id.as_deref(),
            signature,
            signature_timestamp,
        }
    }
}

// =============================================================================
// REST API Response Types
// =============================================================================

/// Body of POST /onboarding
#[derive(Debug, Serialize)]
pub struct OnboardingRequest<'a> {
    pub public_key: &'a str,
}

/// JWT token response from POST /auth
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub jwt_token: String,
}
