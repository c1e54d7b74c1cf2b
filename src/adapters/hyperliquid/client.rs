//! Hyperliquid REST Client
//!
//! Thin client over `POST /info` (public reads) and `POST /exchange`
//! (signed L1 actions). Every call is bounded by the configured timeout.

use async_trait::async_trait;
use ethers::signers::LocalWallet;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::ExchangeApi;
use crate::adapters::types::{create_http_client, current_time_ms};

use super::config::HyperliquidConfig;
use super::signing::{sign_l1_action, wallet_from_private_key};
use super::types::{
    Action, AssetInfo, ClearinghouseState, ExchangePayload, ExchangeResponse, InfoRequest, L2Book,
    Meta, OpenOrder, OrderWire, UpdateLeverage,
};

/// Signed REST client for a single Hyperliquid account
pub struct HyperliquidClient {
    config: HyperliquidConfig,
    http_client: reqwest::Client,
    wallet: LocalWallet,
}

impl std::fmt::Debug for HyperliquidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperliquidClient")
            .field("api_url", &self.config.api_url())
            .field("wallet_address", &self.config.wallet_address)
            .field("testnet", &self.config.testnet)
            .finish()
    }
}

impl HyperliquidClient {
    /// Create a client; fails if the private key cannot be parsed
    pub fn new(config: HyperliquidConfig) -> ExchangeResult<Self> {
        let wallet = wallet_from_private_key(&config.private_key)?;
        let http_client = create_http_client("hyperliquid", Some(config.request_timeout));

        tracing::info!(
            exchange = "hyperliquid",
            api_url = %config.api_url(),
            testnet = config.testnet,
            coin = %config.coin,
            "Hyperliquid client created"
        );

        Ok(Self {
            config,
            http_client,
            wallet,
        })
    }

    fn timeout_ms(&self) -> u64 {
        self.config.request_timeout.as_millis() as u64
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ExchangeResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.api_url(), path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ExchangeError::from_transport(e, self.timeout_ms()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(
                exchange = "hyperliquid",
                path,
                status = status.as_u16(),
                body = %text,
                "Hyperliquid request failed"
            );
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid JSON: {} - {}", e, text)))
    }

    async fn info<T: DeserializeOwned>(&self, request: InfoRequest<'_>) -> ExchangeResult<T> {
        self.post_json("/info", &request).await
    }

    /// Sign and submit an L1 action; nonce is the current time in ms
    async fn submit_action(&self, action: Action) -> ExchangeResult<serde_json::Value> {
        let nonce = current_time_ms();
        let signature = sign_l1_action(&self.wallet, &action, nonce, self.config.is_mainnet())?;
        let payload = ExchangePayload {
            action: &action,
            nonce,
            signature,
            vault_address: None,
        };

        let response: ExchangeResponse = self.post_json("/exchange", &payload).await?;
        response.into_result()
    }
}

#[async_trait]
impl ExchangeApi for HyperliquidClient {
    async fn l2_book(&self, coin: &str) -> ExchangeResult<L2Book> {
        self.info(InfoRequest::L2Book { coin }).await
    }

    async fn clearinghouse_state(&self) -> ExchangeResult<ClearinghouseState> {
        self.info(InfoRequest::ClearinghouseState {
            user: &self.config.wallet_address,
        })
        .await
    }

    async fn open_orders(&self) -> ExchangeResult<Vec<OpenOrder>> {
        self.info(InfoRequest::OpenOrders {
            user: &self.config.wallet_address,
        })
        .await
    }

    async fn asset_info(&self, coin: &str) -> ExchangeResult<AssetInfo> {
        let meta: Meta = self.info(InfoRequest::Meta).await?;
        meta.asset_info(coin)
            .ok_or_else(|| ExchangeError::InvalidOrder(format!("Unknown coin: {}", coin)))
    }

    async fn update_leverage(&self, asset: u32, leverage: u32, is_cross: bool) -> ExchangeResult<()> {
        let action = Action::UpdateLeverage(UpdateLeverage {
            asset,
            is_cross,
            leverage,
        });
        self.submit_action(action).await?;
        tracing::info!(exchange = "hyperliquid", asset, leverage, is_cross, "Leverage updated");
        Ok(())
    }

    async fn place_order(&self, order: OrderWire) -> ExchangeResult<serde_json::Value> {
        tracing::info!(
            exchange = "hyperliquid",
            asset = order.asset,
            is_buy = order.is_buy,
            limit_px = %order.limit_px,
            sz = %order.sz,
            reduce_only = order.reduce_only,
            cloid = ?order.cloid,
            "Placing IOC order"
        );
        self.submit_action(Action::order(vec![order])).await
    }
}
