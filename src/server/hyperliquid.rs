//! Hyperliquid routes: account data, open long, close position.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use super::{json_response, not_configured, AppState};
use crate::adapters::errors::ExchangeError;
use crate::config::constants::{default_slippage_pct, default_usdc_amount, DEFAULT_LEVERAGE};
use crate::core::{HyperliquidTradingService, TradeResult};

const EXCHANGE: &str = "Hyperliquid";

/// Body of POST /api/trade; every field is optional
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    #[serde(default = "default_usdc_amount")]
    pub usdc_amount: Decimal,
    #[serde(default = "default_leverage")]
    pub leverage: u32,
    #[serde(default = "default_slippage_pct")]
    pub slippage: Decimal,
}

fn default_leverage() -> u32 {
    DEFAULT_LEVERAGE
}

impl Default for TradeRequest {
    fn default() -> Self {
        Self {
            usdc_amount: default_usdc_amount(),
            leverage: DEFAULT_LEVERAGE,
            slippage: default_slippage_pct(),
        }
    }
}

#[derive(Serialize)]
struct PriceData<'a> {
    coin: &'a str,
    price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    ask: Option<Decimal>,
}

fn service(state: &AppState) -> Result<&HyperliquidTradingService, Response> {
    state.hyperliquid.as_ref().ok_or_else(|| not_configured(EXCHANGE))
}

fn data_error(route: &str, e: ExchangeError) -> Response {
    error!(route, error = %e, "Hyperliquid data request failed");
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": e.to_string() }),
    )
}

fn trade_response(result: TradeResult) -> Response {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    json_response(status, json!(result))
}

/// GET /api/account: clearinghouse state of the configured wallet
pub(super) async fn account_handler(State(state): State<AppState>) -> Response {
    let service = match service(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match service.get_account_state().await {
        Ok(account) => json_response(StatusCode::OK, json!({ "success": true, "data": account })),
        Err(e) => data_error("/api/account", e),
    }
}

/// GET /api/price: best bid (and ask when quoted) of the tracked coin
pub(super) async fn price_handler(State(state): State<AppState>) -> Response {
    let service = match service(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match service.get_bid_ask().await {
        Ok((price, ask)) => {
            let data = PriceData {
                coin: service.coin(),
                price,
                ask,
            };
            json_response(StatusCode::OK, json!({ "success": true, "data": data }))
        }
        Err(e) => data_error("/api/price", e),
    }
}

/// GET /api/orders: open orders of the configured wallet
pub(super) async fn orders_handler(State(state): State<AppState>) -> Response {
    let service = match service(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match service.get_open_orders().await {
        Ok(orders) => json_response(StatusCode::OK, json!({ "success": true, "data": orders })),
        Err(e) => data_error("/api/orders", e),
    }
}

/// Parse a trade body; an empty body means all defaults
fn parse_trade_request(body: &[u8]) -> Result<TradeRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TradeRequest::default());
    }
    serde_json::from_slice(body)
}

/// POST /api/trade: open a long position
///
/// An empty body uses the defaults; a body that does not parse is a 400.
pub(super) async fn trade_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let service = match service(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let request = match parse_trade_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid trade request body");
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": format!("Invalid trade request: {}", e) }),
            );
        }
    };
    info!(
        usdc_amount = %request.usdc_amount,
        leverage = request.leverage,
        slippage = %request.slippage,
        "Trade request received"
    );

    let result = service
        .open_long_position(request.usdc_amount, request.leverage, request.slippage)
        .await;
    trade_response(result)
}

/// POST /api/close: close the open position
pub(super) async fn close_handler(State(state): State<AppState>) -> Response {
    let service = match service(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    info!("Close request received");
    trade_response(service.close_position().await)
}
