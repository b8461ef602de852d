//! Collaborator traits consumed by the decision engine.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use common::{Action, Candle, MarketSnapshot, Position, Result};

/// An order handed to the execution side after the gate approves it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub instrument_id: String,
    pub action: Action,
    pub quantity: i64,
    /// Reference price at submission time, used for paper fills and logs.
    pub price: f64,
    pub reason: String,
}

/// Yields a batch of market snapshots per poll.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn poll(&mut self) -> Result<Vec<MarketSnapshot>>;
}

/// Daily candles for swing metrics. Callers must tolerate failure by
/// degrading to an absent historical context.
#[async_trait]
pub trait HistoricalDataSource: Send + Sync {
    async fn daily_candles(
        &self,
        instrument_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Candle>>;
}

/// Current available trading capital. Consumed only through the funds cache.
#[async_trait]
pub trait CapitalSource: Send + Sync {
    async fn available_funds(&self) -> Result<f64>;
}

/// Net holdings keyed by instrument id.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn positions(&self) -> Result<HashMap<String, Position>>;
}

/// Places an approved order on the venue.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    async fn execute(&mut self, order: &OrderRequest) -> Result<()>;
}

/// Everything the bot needs from one brokerage connection.
pub trait Brokerage:
    MarketDataSource + HistoricalDataSource + CapitalSource + PositionSource + OrderExecutor
{
}

impl<T> Brokerage for T where
    T: MarketDataSource + HistoricalDataSource + CapitalSource + PositionSource + OrderExecutor
{
}
