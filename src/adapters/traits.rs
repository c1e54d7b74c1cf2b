//! Exchange API trait definition
//!
//! `ExchangeApi` is the seam between the Hyperliquid trading service and the
//! REST client, so the service can be driven by an in-memory exchange in tests.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::hyperliquid::types::{AssetInfo, ClearinghouseState, L2Book, OpenOrder, OrderWire};

/// Read and trade operations used by the trading service
///
/// # Example Implementation
///
/// ```ignore
/// struct PaperExchange { book: L2Book }
///
/// #[async_trait]
/// impl ExchangeApi for PaperExchange {
///     async fn l2_book(&self, _coin: &str) -> ExchangeResult<L2Book> {
///         Ok(self.book.clone())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Orderbook snapshot for a coin (bids first)
    async fn l2_book(&self, coin: &str) -> ExchangeResult<L2Book>;

    /// Margin summary and positions of the configured account
    async fn clearinghouse_state(&self) -> ExchangeResult<ClearinghouseState>;

    /// Resting orders of the configured account
    async fn open_orders(&self) -> ExchangeResult<Vec<OpenOrder>>;

    /// Resolve a coin to its numeric asset id and size precision
    ///
    /// Returns `InvalidOrder` if the coin is not listed.
    async fn asset_info(&self, coin: &str) -> ExchangeResult<AssetInfo>;

    /// Set leverage for an asset (cross margin when `is_cross`)
    async fn update_leverage(&self, asset: u32, leverage: u32, is_cross: bool) -> ExchangeResult<()>;

    /// Submit a single order; returns the exchange's response payload
    async fn place_order(&self, order: OrderWire) -> ExchangeResult<serde_json::Value>;
}
