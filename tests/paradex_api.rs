//! HTTP API tests for the Paradex routes
//!
//! A mockito server plays the Paradex REST API; the router runs the real
//! Starknet signing and the onboard → auth → order → list → account sequence.
//!
//! # Running the tests
//! ```bash
//! cargo test --test paradex_api
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use perp_gateway::adapters::{ParadexAccount, ParadexClient, ParadexSystemConfig};
use perp_gateway::server::{build_router, AppState, ParadexState};

const PRIVATE_KEY: &str = "0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79";
const ACCOUNT_ADDRESS: &str = "0x0224d5e9e8f6c5b3d8bb7c2f13d8cb0a41a4c43a53b5a0f29bc7b2f5c0fdb1bd";
const ETHEREUM_ACCOUNT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
const JWT: &str = "eyJhbGciOiJIUzI1NiJ9.test.token";

// =============================================================================
// Helpers
// =============================================================================

fn app(server: &ServerGuard) -> Router {
    let account = ParadexAccount::from_private_key(PRIVATE_KEY, ACCOUNT_ADDRESS, ETHEREUM_ACCOUNT).unwrap();
    let client = ParadexClient::new(ParadexSystemConfig {
        api_base_url: server.url(),
        ..Default::default()
    });

    build_router(AppState {
        testnet: true,
        hyperliquid: None,
        paradex: Some(Arc::new(ParadexState { client, account })),
    })
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn limit_sell() -> Value {
    json!({
        "market": "ETH-USD-PERP",
        "side": "SELL",
        "type": "LIMIT",
        "size": "10",
        "price": "3292.04",
        "instruction": "GTC"
    })
}

// =============================================================================
// Trade run
// =============================================================================

#[tokio::test]
async fn test_trade_run_succeeds_for_onboarded_account() {
    let mut server = mockito::Server::new_async().await;
    let onboarding = server
        .mock("POST", "/onboarding")
        .match_header("PARADEX-STARKNET-ACCOUNT", ACCOUNT_ADDRESS)
        .with_status(400)
        .with_body(r#"{"error":"ALREADY_ONBOARDED"}"#)
        .expect(1)
        .create_async()
        .await;
    let auth = server
        .mock("POST", "/auth")
        .match_header("PARADEX-SIGNATURE-EXPIRATION", Matcher::Regex(r"^\d+$".into()))
        .with_status(200)
        .with_body(json!({ "jwt_token": JWT }).to_string())
        .expect(1)
        .create_async()
        .await;
    let order = server
        .mock("POST", "/orders")
        .match_header("authorization", format!("Bearer {}", JWT).as_str())
        .match_body(Matcher::PartialJson(json!({
            "market": "ETH-USD-PERP",
            "side": "SELL",
            "type": "LIMIT",
            "size": "10",
            "price": "3292.04",
            "instruction": "GTC"
        })))
        .with_status(201)
        .with_body(r#"{"id":"order-1","status":"NEW"}"#)
        .expect(1)
        .create_async()
        .await;
    let open_orders = server
        .mock("GET", "/orders")
        .match_header("authorization", format!("Bearer {}", JWT).as_str())
        .with_status(200)
        .with_body(r#"{"results":[{"id":"order-1","market":"ETH-USD-PERP"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let account = server
        .mock("GET", "/account")
        .with_status(200)
        .with_body(json!({ "account": ACCOUNT_ADDRESS, "status": "ACTIVE" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let (status, body) = call(
        app(&server),
        request("POST", "/api/paradex/trade", Some(limit_sell())),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "ok");
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0]["step"], "onboard");
    assert_eq!(steps[0]["status"], "failed");
    assert_eq!(steps[1]["status"], "ok");
    assert_eq!(steps[2]["data"]["id"], "order-1");
    assert_eq!(steps[3]["data"]["results"][0]["id"], "order-1");
    assert_eq!(steps[4]["data"]["status"], "ACTIVE");

    onboarding.assert_async().await;
    auth.assert_async().await;
    order.assert_async().await;
    open_orders.assert_async().await;
    account.assert_async().await;
}

#[tokio::test]
async fn test_failed_auth_skips_order_steps() {
    let mut server = mockito::Server::new_async().await;
    let _onboarding = server
        .mock("POST", "/onboarding")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _auth = server
        .mock("POST", "/auth")
        .with_status(401)
        .with_body(r#"{"error":"INVALID_STARKNET_SIGNATURE"}"#)
        .create_async()
        .await;
    let create = server.mock("POST", "/orders").expect(0).create_async().await;
    let list = server.mock("GET", "/orders").expect(0).create_async().await;
    let account = server.mock("GET", "/account").expect(0).create_async().await;

    let (status, body) = call(
        app(&server),
        request("POST", "/api/paradex/trade", Some(limit_sell())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["failed_step"], "authenticate");
    assert!(body["error"].as_str().unwrap().contains("401"));
    let statuses: Vec<&str> = body["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["ok", "failed", "skipped", "skipped", "skipped"]);

    create.assert_async().await;
    list.assert_async().await;
    account.assert_async().await;
}

#[tokio::test]
async fn test_order_failure_reports_create_order_step() {
    let mut server = mockito::Server::new_async().await;
    let _onboarding = server.mock("POST", "/onboarding").with_status(200).with_body("{}").create_async().await;
    let _auth = server
        .mock("POST", "/auth")
        .with_status(200)
        .with_body(json!({ "jwt_token": JWT }).to_string())
        .create_async()
        .await;
    let _order = server
        .mock("POST", "/orders")
        .with_status(400)
        .with_body(r#"{"error":"ORDER_SIZE_BELOW_MIN"}"#)
        .create_async()
        .await;
    let list = server.mock("GET", "/orders").with_status(200).with_body(r#"{"results":[]}"#).expect(1).create_async().await;
    let account = server.mock("GET", "/account").with_status(200).with_body("{}").expect(1).create_async().await;

    let (status, body) = call(
        app(&server),
        request("POST", "/api/paradex/trade", Some(limit_sell())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["failed_step"], "create_order");
    assert!(body["error"].as_str().unwrap().contains("ORDER_SIZE_BELOW_MIN"));
    list.assert_async().await;
    account.assert_async().await;
}

#[tokio::test]
async fn test_invalid_order_rejected_before_any_call() {
    let mut server = mockito::Server::new_async().await;
    let onboarding = server.mock("POST", "/onboarding").expect(0).create_async().await;
    let auth = server.mock("POST", "/auth").expect(0).create_async().await;

    let (status, body) = call(
        app(&server),
        request(
            "POST",
            "/api/paradex/trade",
            Some(json!({"market": "ETH-USD-PERP", "side": "BUY", "type": "LIMIT", "size": "1"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("positive price"));
    onboarding.assert_async().await;
    auth.assert_async().await;
}

#[tokio::test]
async fn test_order_finer_than_eight_decimals_rejected_before_any_call() {
    let mut server = mockito::Server::new_async().await;
    let onboarding = server.mock("POST", "/onboarding").expect(0).create_async().await;
    let auth = server.mock("POST", "/auth").expect(0).create_async().await;
    let orders = server.mock("POST", "/orders").expect(0).create_async().await;

    let (status, body) = call(
        app(&server),
        request(
            "POST",
            "/api/paradex/trade",
            Some(json!({
                "market": "ETH-USD-PERP", "side": "BUY", "type": "LIMIT",
                "size": "0.123456789", "price": "3000"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("more than 8 decimals"));
    onboarding.assert_async().await;
    auth.assert_async().await;
    orders.assert_async().await;
}

// =============================================================================
// Markets and cancellation
// =============================================================================

#[tokio::test]
async fn test_markets_route_forwards_filter() {
    let mut server = mockito::Server::new_async().await;
    let markets = server
        .mock("GET", "/markets")
        .match_query(Matcher::UrlEncoded("market".into(), "BTC-USD-PERP".into()))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"results":[{"symbol":"BTC-USD-PERP"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = call(
        app(&server),
        request("GET", "/api/paradex/markets?market=BTC-USD-PERP", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["results"][0]["symbol"], "BTC-USD-PERP");
    markets.assert_async().await;
}

#[tokio::test]
async fn test_cancel_orders_authenticates_first() {
    let mut server = mockito::Server::new_async().await;
    let _auth = server
        .mock("POST", "/auth")
        .with_status(200)
        .with_body(json!({ "jwt_token": JWT }).to_string())
        .create_async()
        .await;
    let cancel = server
        .mock("DELETE", "/orders")
        .match_header("authorization", format!("Bearer {}", JWT).as_str())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = call(app(&server), request("DELETE", "/api/paradex/orders", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null}));
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_cancel_orders_auth_failure_is_502() {
    let mut server = mockito::Server::new_async().await;
    let _auth = server.mock("POST", "/auth").with_status(401).with_body("unauthorized").create_async().await;
    let cancel = server.mock("DELETE", "/orders").expect(0).create_async().await;

    let (status, body) = call(app(&server), request("DELETE", "/api/paradex/orders", None)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_hyperliquid_routes_unavailable_without_config() {
    let server = mockito::Server::new_async().await;
    let (status, body) = call(app(&server), request("POST", "/api/trade", None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Hyperliquid is not configured");
}
