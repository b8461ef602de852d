//! Domain types shared across the bot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One tick of market data for a single instrument.
///
/// Snapshots are read-only inputs; nothing downstream mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub instrument_id: String,
    /// Human-readable symbol, when the instrument mapping knows one.
    #[serde(default)]
    pub symbol: Option<String>,
    pub last_price: f64,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

/// A daily OHLC candle from the historical data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Net holding for one instrument. Positive quantity = long.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    pub instrument_id: String,
    pub net_quantity: f64,
    #[serde(default)]
    pub average_price: Option<f64>,
}

/// Direction of a normalized trade recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Hold,
}

/// Canonical decision form every upstream payload is normalized into.
///
/// Fields are always in range: confidence in [0, 1], quantity >= 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecommendation {
    pub action: Action,
    pub confidence: f64,
    pub quantity: i64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
}

impl TradeRecommendation {
    /// Safe default used whenever the upstream payload is unusable.
    pub fn hold() -> Self {
        Self {
            action: Action::Hold,
            confidence: 0.0,
            quantity: 0,
            reasoning: String::new(),
            stop_loss: None,
            take_profit: None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self.action, Action::Buy | Action::Sell)
    }
}

impl Default for TradeRecommendation {
    fn default() -> Self {
        Self::hold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_is_not_actionable() {
        let rec = TradeRecommendation::hold();
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.confidence, 0.0);
        assert!(!rec.is_actionable());
    }

    #[test]
    fn buy_and_sell_are_actionable() {
        let buy = TradeRecommendation {
            action: Action::Buy,
            confidence: 0.8,
            quantity: 100,
            ..TradeRecommendation::hold()
        };
        assert!(buy.is_actionable());

        let sell = TradeRecommendation {
            action: Action::Sell,
            confidence: 0.9,
            quantity: 50,
            ..TradeRecommendation::hold()
        };
        assert!(sell.is_actionable());
    }
}
