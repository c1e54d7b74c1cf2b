//! HTTP API server triggering trades on Hyperliquid and Paradex.
//!
//! Uses `axum` for routing with CORS and request tracing.

mod hyperliquid;
mod paradex;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::adapters::types::current_time_ms;
use crate::adapters::{HyperliquidClient, ParadexAccount, ParadexClient};
use crate::config::AppConfig;
use crate::core::HyperliquidTradingService;
use crate::error::Result;

/// Paradex client plus the configured account
#[derive(Debug)]
pub struct ParadexState {
    pub client: ParadexClient,
    pub account: ParadexAccount,
}

/// Shared application state for the HTTP server.
///
/// Read-only after startup; an exchange that is not configured is `None`.
#[derive(Clone)]
pub struct AppState {
    pub testnet: bool,
    pub hyperliquid: Option<HyperliquidTradingService>,
    pub paradex: Option<Arc<ParadexState>>,
}

impl AppState {
    /// Build the exchange clients described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let hyperliquid = match &config.hyperliquid {
            Some(hl) => {
                let client = HyperliquidClient::new(hl.clone())?;
                Some(HyperliquidTradingService::new(Arc::new(client), hl.coin.clone()))
            }
            None => None,
        };

        let paradex = config.paradex.as_ref().map(|settings| {
            Arc::new(ParadexState {
                client: ParadexClient::new(settings.system.clone()),
                account: settings.account.clone(),
            })
        });

        Ok(Self {
            testnet: config.testnet,
            hyperliquid,
            paradex,
        })
    }
}

/// Build the router with every route and layer attached.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/account", get(hyperliquid::account_handler))
        .route("/api/price", get(hyperliquid::price_handler))
        .route("/api/orders", get(hyperliquid::orders_handler))
        .route("/api/trade", post(hyperliquid::trade_handler))
        .route("/api/close", post(hyperliquid::close_handler))
        .route("/api/paradex/trade", post(paradex::trade_handler))
        .route("/api/paradex/markets", get(paradex::markets_handler))
        .route("/api/paradex/orders", delete(paradex::cancel_orders_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// Blocks until the server shuts down.
pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(address = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health: server status
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "testnet": state.testnet,
        "timestamp": current_time_ms(),
    }))
}

pub(crate) fn json_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

pub(crate) fn not_configured(exchange: &str) -> Response {
    json_response(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({
            "success": false,
            "error": format!("{} is not configured", exchange),
        }),
    )
}
