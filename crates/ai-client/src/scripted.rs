//! Canned decision source for dry runs and tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use common::TradeRecommendation;

use crate::types::{DecisionError, DecisionRequest, DecisionSource};

/// Replays a fixed sequence of recommendations, then holds.
pub struct ScriptedDecisionSource {
    script: Mutex<VecDeque<TradeRecommendation>>,
}

impl ScriptedDecisionSource {
    pub fn new(script: Vec<TradeRecommendation>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// A source that always holds.
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DecisionSource for ScriptedDecisionSource {
    async fn decide(
        &self,
        _request: &DecisionRequest,
    ) -> Result<TradeRecommendation, DecisionError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| DecisionError::Api("scripted source poisoned".into()))?;
        Ok(script.pop_front().unwrap_or_else(TradeRecommendation::hold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{Action, MarketSnapshot};
    use feature_engine::{extract_features, HistoryBuffer};
    use uuid::Uuid;

    fn request() -> DecisionRequest {
        let snapshot = MarketSnapshot {
            instrument_id: "1333".into(),
            symbol: None,
            last_price: 100.0,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            volume: 1000.0,
            timestamp: Utc::now(),
        };
        let mut history = HistoryBuffer::default();
        history.push(snapshot.clone());
        let features = extract_features(&snapshot, &history);
        DecisionRequest {
            request_id: Uuid::new_v4(),
            instrument_id: "1333".into(),
            symbol: None,
            snapshot,
            features,
            net_position: 0.0,
            risk: crate::types::RiskSummary {
                min_confidence: 0.7,
                risk_per_trade: 0.02,
                max_position_size: 1000,
                stop_loss_percent: 0.05,
                take_profit_percent: 0.1,
                max_daily_trades: 10,
            },
        }
    }

    #[tokio::test]
    async fn replays_script_then_holds() {
        let buy = TradeRecommendation {
            action: Action::Buy,
            confidence: 0.9,
            quantity: 10,
            ..TradeRecommendation::hold()
        };
        let source = ScriptedDecisionSource::new(vec![buy]);

        let first = source.decide(&request()).await.unwrap();
        assert_eq!(first.action, Action::Buy);
        let second = source.decide(&request()).await.unwrap();
        assert_eq!(second.action, Action::Hold);
    }
}
