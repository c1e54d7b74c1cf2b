//! Paradex routes: trade run, markets, cancel all.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::{json_response, not_configured, AppState, ParadexState};
use crate::adapters::errors::ExchangeResult;
use crate::adapters::OrderIntent;
use crate::core::{cancel_all_orders, run_paradex_trade};

const EXCHANGE: &str = "Paradex";

/// Optional `?market=` filter
#[derive(Debug, Default, Deserialize)]
pub struct MarketQuery {
    pub market: Option<String>,
}

fn paradex(state: &AppState) -> Result<Arc<ParadexState>, Response> {
    state.paradex.clone().ok_or_else(|| not_configured(EXCHANGE))
}

fn passthrough(route: &str, result: ExchangeResult<Value>) -> Response {
    match result {
        Ok(data) => json_response(StatusCode::OK, json!({ "success": true, "data": data })),
        Err(e) => {
            error!(route, error = %e, "Paradex request failed");
            json_response(
                StatusCode::BAD_GATEWAY,
                json!({ "success": false, "error": e.to_string() }),
            )
        }
    }
}

/// POST /api/paradex/trade: onboard, authenticate and place `intent`
///
/// 200 when every required step succeeded, 502 with the failing step otherwise.
pub(super) async fn trade_handler(
    State(state): State<AppState>,
    Json(intent): Json<OrderIntent>,
) -> Response {
    let paradex = match paradex(&state) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    if let Err(e) = intent.validate() {
        warn!(error = %e, "Rejected Paradex order");
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({ "status": "error", "error": e.to_string() }),
        );
    }

    let report = run_paradex_trade(&paradex.client, &paradex.account, &intent).await;

    match report.failed_step() {
        None => json_response(
            StatusCode::OK,
            json!({ "status": "ok", "steps": report.steps }),
        ),
        Some(failed) => json_response(
            StatusCode::BAD_GATEWAY,
            json!({
                "status": "error",
                "failed_step": failed.step,
                "error": failed.error,
                "steps": report.steps,
            }),
        ),
    }
}

/// GET /api/paradex/markets: public market list
pub(super) async fn markets_handler(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Response {
    let paradex = match paradex(&state) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let result = paradex
        .client
        .list_available_markets(query.market.as_deref())
        .await;
    passthrough("/api/paradex/markets", result)
}

/// DELETE /api/paradex/orders: cancel all open orders
pub(super) async fn cancel_orders_handler(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Response {
    let paradex = match paradex(&state) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let result = cancel_all_orders(&paradex.client, &paradex.account, query.market.as_deref()).await;
    passthrough("/api/paradex/orders", result)
}
