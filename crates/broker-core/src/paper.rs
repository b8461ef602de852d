//! In-memory brokerage for dry runs and tests.
//!
//! Replays scripted snapshot batches, settles fills against simulated funds
//! and positions, and serves canned daily candles.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use common::{Action, Candle, Error, MarketSnapshot, Position, Result};

use crate::traits::{
    CapitalSource, HistoricalDataSource, MarketDataSource, OrderExecutor, OrderRequest,
    PositionSource,
};

#[derive(Debug)]
pub struct PaperBroker {
    ticks: VecDeque<Vec<MarketSnapshot>>,
    candles: HashMap<String, Vec<Candle>>,
    funds: f64,
    positions: HashMap<String, Position>,
    fills: Vec<OrderRequest>,
}

impl PaperBroker {
    pub fn new(starting_funds: f64) -> Self {
        Self {
            ticks: VecDeque::new(),
            candles: HashMap::new(),
            funds: starting_funds.max(0.0),
            positions: HashMap::new(),
            fills: Vec::new(),
        }
    }

    /// Queue one batch of snapshots to be returned by the next poll.
    pub fn push_batch(&mut self, batch: Vec<MarketSnapshot>) {
        self.ticks.push_back(batch);
    }

    pub fn set_candles(&mut self, instrument_id: &str, candles: Vec<Candle>) {
        self.candles.insert(instrument_id.to_string(), candles);
    }

    pub fn set_position(&mut self, position: Position) {
        self.positions
            .insert(position.instrument_id.clone(), position);
    }

    pub fn funds(&self) -> f64 {
        self.funds
    }

    pub fn fills(&self) -> &[OrderRequest] {
        &self.fills
    }

    pub fn has_pending_ticks(&self) -> bool {
        !self.ticks.is_empty()
    }
}

#[async_trait]
impl MarketDataSource for PaperBroker {
    async fn poll(&mut self) -> Result<Vec<MarketSnapshot>> {
        Ok(self.ticks.pop_front().unwrap_or_default())
    }
}

#[async_trait]
impl HistoricalDataSource for PaperBroker {
    async fn daily_candles(
        &self,
        instrument_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let candles = self
            .candles
            .get(instrument_id)
            .map(|candles| {
                candles
                    .iter()
                    .filter(|candle| candle.date >= from && candle.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(candles)
    }
}

#[async_trait]
impl CapitalSource for PaperBroker {
    async fn available_funds(&self) -> Result<f64> {
        Ok(self.funds)
    }
}

#[async_trait]
impl PositionSource for PaperBroker {
    async fn positions(&self) -> Result<HashMap<String, Position>> {
        Ok(self.positions.clone())
    }
}

#[async_trait]
impl OrderExecutor for PaperBroker {
    async fn execute(&mut self, order: &OrderRequest) -> Result<()> {
        let trade_value = order.price * order.quantity as f64;
        let position = self
            .positions
            .entry(order.instrument_id.clone())
            .or_insert_with(|| Position {
                instrument_id: order.instrument_id.clone(),
                ..Position::default()
            });

        match order.action {
            Action::Buy => {
                if trade_value > self.funds {
                    return Err(Error::RiskViolation(format!(
                        "insufficient paper funds: {:.2} > {:.2}",
                        trade_value, self.funds
                    )));
                }
                self.funds -= trade_value;
                position.net_quantity += order.quantity as f64;
            }
            Action::Sell => {
                if (order.quantity as f64) > position.net_quantity {
                    return Err(Error::RiskViolation(format!(
                        "insufficient paper position for {}: {} > {}",
                        order.instrument_id, order.quantity, position.net_quantity
                    )));
                }
                self.funds += trade_value;
                position.net_quantity -= order.quantity as f64;
            }
            Action::Hold => {
                return Err(Error::Other("cannot execute a HOLD order".into()));
            }
        }

        info!(
            instrument_id = %order.instrument_id,
            action = ?order.action,
            quantity = order.quantity,
            price = order.price,
            "paper fill"
        );
        self.fills.push(order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(id: &str, price: f64) -> MarketSnapshot {
        MarketSnapshot {
            instrument_id: id.into(),
            symbol: None,
            last_price: price,
            open: price,
            high: price,
            low: price,
            volume: 1000.0,
            timestamp: Utc::now(),
        }
    }

    fn order(id: &str, action: Action, quantity: i64, price: f64) -> OrderRequest {
        OrderRequest {
            instrument_id: id.into(),
            action,
            quantity,
            price,
            reason: "test".into(),
        }
    }

    #[tokio::test]
    async fn poll_replays_batches_in_order() {
        let mut broker = PaperBroker::new(10_000.0);
        broker.push_batch(vec![snapshot("1333", 100.0)]);
        broker.push_batch(vec![snapshot("1333", 101.0)]);

        let first = broker.poll().await.unwrap();
        assert_eq!(first[0].last_price, 100.0);
        let second = broker.poll().await.unwrap();
        assert_eq!(second[0].last_price, 101.0);
        assert!(broker.poll().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn buy_settles_against_funds_and_positions() {
        let mut broker = PaperBroker::new(10_000.0);
        broker
            .execute(&order("1333", Action::Buy, 10, 100.0))
            .await
            .unwrap();

        assert_eq!(broker.funds(), 9_000.0);
        let positions = broker.positions().await.unwrap();
        assert_eq!(positions["1333"].net_quantity, 10.0);
        assert_eq!(broker.fills().len(), 1);
    }

    #[tokio::test]
    async fn buy_beyond_funds_is_rejected() {
        let mut broker = PaperBroker::new(500.0);
        let result = broker.execute(&order("1333", Action::Buy, 10, 100.0)).await;
        assert!(matches!(result, Err(Error::RiskViolation(_))));
        assert_eq!(broker.funds(), 500.0);
    }

    #[tokio::test]
    async fn sell_beyond_position_is_rejected() {
        let mut broker = PaperBroker::new(1_000.0);
        let result = broker.execute(&order("1333", Action::Sell, 5, 100.0)).await;
        assert!(matches!(result, Err(Error::RiskViolation(_))));
    }
}
