//! Paradex REST Client
//!
//! Onboarding, authentication, orders, markets and account calls. Every
//! call returns `ExchangeResult`; failures are logged and handed back to the
//! caller.

use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{create_http_client, current_time_ms, current_time_secs};
use crate::core::logging::{sanitize_signature, SanitizedValue};

use super::config::{ParadexAccount, ParadexSystemConfig};
use super::signing::{sign_auth_request, sign_onboarding_request, sign_order};
use super::types::{AuthResponse, OnboardingRequest, OrderIntent, OrderRequest};

/// REST client bound to one Paradex deployment
#[derive(Debug, Clone)]
pub struct ParadexClient {
    config: ParadexSystemConfig,
    http_client: reqwest::Client,
}

impl ParadexClient {
    pub fn new(config: ParadexSystemConfig) -> Self {
        // No request timeout: calls wait for the exchange to answer
        let http_client = create_http_client("paradex", None);
        tracing::info!(
            exchange = "paradex",
            api_base_url = %config.api_base_url,
            chain_id = %config.chain_id,
            "Paradex client created"
        );
        Self {
            config,
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Accept", "application/json")
    }

    fn bearer(
        &self,
        method: Method,
        url: &str,
        account: &ParadexAccount,
    ) -> ExchangeResult<RequestBuilder> {
        let token = account.bearer_token()?;
        Ok(self
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token)))
    }

    /// Send, check status and parse the body as JSON; errors are logged here
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> ExchangeResult<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(exchange = "paradex", operation, error = %e, "Paradex request failed");
            ExchangeError::ConnectionFailed(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(
                exchange = "paradex",
                operation,
                status = status.as_u16(),
                body = %text,
                "Paradex API error"
            );
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(exchange = "paradex", operation, status = status.as_u16(), "Paradex response received");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(exchange = "paradex", operation, error = %e, "Invalid Paradex JSON");
            ExchangeError::InvalidResponse(format!("Invalid JSON: {} - {}", e, text))
        })
    }

    /// POST /onboarding with a signed onboarding message
    pub async fn onboard_user(&self, account: &ParadexAccount) -> ExchangeResult<Value> {
        let timestamp = current_time_ms();
        let signature = sign_onboarding_request(&self.config, account)?;

        let request = self
            .request(Method::POST, &self.url("/onboarding"))
            .header("PARADEX-ETHEREUM-ACCOUNT", &account.ethereum_account)
            .header("PARADEX-STARKNET-ACCOUNT", &account.address)
            .header("PARADEX-STARKNET-SIGNATURE", &signature)
            .header("PARADEX-TIMESTAMP", timestamp.to_string())
            .json(&OnboardingRequest {
                public_key: &account.public_key,
            });

        let result = self.send("onboarding", request).await?;
        tracing::info!(exchange = "paradex", account = %account.address, "Onboarding successful");
        Ok(result)
    }

    /// POST /auth; stores the JWT on `account` and returns it
    pub async fn authenticate(&self, account: &mut ParadexAccount) -> ExchangeResult<String> {
        let auth = sign_auth_request(&self.config, account, current_time_secs())?;

        tracing::info!(
            exchange = "paradex",
            account = %account.address,
            timestamp = auth.timestamp,
            expiration = auth.expiration,
            signature = %sanitize_signature(&auth.signature),
            "Paradex auth request"
        );

        let request = self
            .request(Method::POST, &self.url("/auth"))
            .header("PARADEX-STARKNET-ACCOUNT", &account.address)
            .header("PARADEX-STARKNET-SIGNATURE", &auth.signature)
            .header("PARADEX-TIMESTAMP", auth.timestamp.to_string())
            .header("PARADEX-SIGNATURE-EXPIRATION", auth.expiration.to_string())
            .json(&serde_json::json!({}));

        let body = self.send("auth", request).await?;
        let auth_response: AuthResponse = serde_json::from_value(body).map_err(|e| {
            ExchangeError::InvalidResponse(format!("No jwt_token in auth response: {}", e))
        })?;
        if auth_response.jwt_token.is_empty() {
            return Err(ExchangeError::AuthenticationFailed("empty jwt_token".into()));
        }

        account.jwt_token = Some(auth_response.jwt_token.clone());
        tracing::info!(
            exchange = "paradex",
            jwt = %SanitizedValue::new(&auth_response.jwt_token),
            "JWT obtained successfully"
        );
        Ok(auth_response.jwt_token)
    }

    /// POST /orders with the signed intent
    pub async fn create_order(
        &self,
        account: &ParadexAccount,
        intent: &OrderIntent,
    ) -> ExchangeResult<Value> {
        intent.validate()?;
        let request = self.bearer(Method::POST, &self.url("/orders"), account)?;

        let timestamp = current_time_ms();
        let signature = sign_order(&self.config, account, intent, timestamp)?;
        let body = OrderRequest::new(intent, signature, timestamp);

        let result = self.send("create_order", request.json(&body)).await?;
        tracing::info!(
            exchange = "paradex",
            market = %intent.market,
            side = intent.side.as_str(),
            order_type = intent.order_type.as_str(),
            size = %intent.size,
            order_id = ?result.get("id"),
            "Order created"
        );
        Ok(result)
    }

    /// GET /orders
    pub async fn get_open_orders(&self, account: &ParadexAccount) -> ExchangeResult<Value> {
        let request = self.bearer(Method::GET, &self.url("/orders"), account)?;
        self.send("get_open_orders", request).await
    }

    /// DELETE /orders, optionally restricted to one market
    pub async fn cancel_all_open_orders(
        &self,
        account: &ParadexAccount,
        market: Option<&str>,
    ) -> ExchangeResult<Value> {
        let mut request = self.bearer(Method::DELETE, &self.url("/orders"), account)?;
        if let Some(market) = market {
            request = request.query(&[("market", market)]);
        }
        let result = self.send("cancel_all_open_orders", request).await?;
        tracing::info!(exchange = "paradex", market = ?market, "All open orders cancelled");
        Ok(result)
    }

    /// GET /markets (public)
    pub async fn list_available_markets(&self, market: Option<&str>) -> ExchangeResult<Value> {
        let mut request = self.request(Method::GET, &self.url("/markets"));
        if let Some(market) = market {
            request = request.query(&[("market", market)]);
        }
        self.send("list_available_markets", request).await
    }

    /// GET /account
    pub async fn get_account_info(&self, account: &ParadexAccount) -> ExchangeResult<Value> {
        let request = self.bearer(Method::GET, &self.url("/account"), account)?;
        self.send("get_account_info", request).await
    }
}
