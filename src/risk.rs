//! Pre-trade veto chain and order-quantity resolution.

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;

use common::{Action, TradeRecommendation};

use crate::config::RiskConfig;
use crate::counters::DailyCounters;
use crate::sizing::size_position;

/// Reason a candidate trade was refused. Ordered to match the veto chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateRejection {
    #[error("recommendation is not actionable")]
    NotActionable,

    #[error("confidence {confidence:.2} below minimum {minimum:.2}")]
    LowConfidence { confidence: f64, minimum: f64 },

    #[error("outside configured trading hours")]
    OutsideTradingHours,

    #[error("daily trade limit reached ({count}/{limit})")]
    DailyLimitReached { count: u32, limit: u32 },

    #[error("trade limit reached for {instrument_id} ({count}/{limit})")]
    SymbolLimitReached {
        instrument_id: String,
        count: u32,
        limit: u32,
    },

    #[error("resolved quantity is zero")]
    ZeroQuantity,

    #[error("no holdings and short selling disabled")]
    ShortSellingDisabled,
}

/// Short-circuiting pre-trade checks; every check is a hard veto.
///
/// The gate performs no mutation beyond the idempotent day rollover. Callers
/// record executed trades against the counters themselves, exactly once per
/// confirmed fill.
#[derive(Debug, Clone)]
pub struct TradeGate {
    config: RiskConfig,
}

impl TradeGate {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Final order quantity for a recommendation.
    ///
    /// An explicit positive upstream quantity is honored; otherwise the risk
    /// budget is sized against the cached funds. Either way the result is
    /// clamped to position limits for the given direction.
    pub fn resolve_quantity(
        &self,
        recommendation: &TradeRecommendation,
        last_price: f64,
        available_funds: Option<f64>,
        net_position: f64,
    ) -> i64 {
        let mut quantity = if recommendation.quantity > 0 {
            recommendation.quantity
        } else {
            size_position(
                last_price,
                available_funds.unwrap_or(0.0),
                self.config.risk_per_trade,
                recommendation.stop_loss,
                self.config.stop_loss_percent,
            )
        };

        match recommendation.action {
            Action::Buy => {
                let allowable = (self.config.max_position_size as f64 - net_position).max(0.0);
                quantity = quantity.min(allowable as i64);
            }
            Action::Sell => {
                if net_position > 0.0 {
                    quantity = quantity.min(net_position as i64);
                } else if !self.config.allow_short_selling {
                    quantity = 0;
                }
            }
            Action::Hold => {}
        }

        quantity.max(0)
    }

    /// Run the veto chain. `now` is injected for determinism.
    pub fn check(
        &self,
        recommendation: &TradeRecommendation,
        instrument_id: &str,
        quantity: i64,
        net_position: f64,
        counters: &mut DailyCounters,
        now: DateTime<Local>,
    ) -> Result<(), GateRejection> {
        if !recommendation.is_actionable() {
            return Err(GateRejection::NotActionable);
        }

        if recommendation.confidence < self.config.min_confidence {
            return Err(GateRejection::LowConfidence {
                confidence: recommendation.confidence,
                minimum: self.config.min_confidence,
            });
        }

        if !self.config.trading_hours.contains(now.time()) {
            return Err(GateRejection::OutsideTradingHours);
        }

        counters.rollover_if_needed(now.date_naive());
        let total = counters.total();
        if self.config.max_daily_trades > 0 && total >= self.config.max_daily_trades {
            return Err(GateRejection::DailyLimitReached {
                count: total,
                limit: self.config.max_daily_trades,
            });
        }
        let symbol_count = counters.for_instrument(instrument_id);
        if self.config.max_trades_per_symbol > 0
            && symbol_count >= self.config.max_trades_per_symbol
        {
            return Err(GateRejection::SymbolLimitReached {
                instrument_id: instrument_id.to_string(),
                count: symbol_count,
                limit: self.config.max_trades_per_symbol,
            });
        }

        if quantity <= 0 {
            return Err(GateRejection::ZeroQuantity);
        }

        if recommendation.action == Action::Sell
            && net_position <= 0.0
            && !self.config.allow_short_selling
        {
            return Err(GateRejection::ShortSellingDisabled);
        }

        Ok(())
    }

    /// Boolean convenience over `check`, logging the veto.
    pub fn should_execute(
        &self,
        recommendation: &TradeRecommendation,
        instrument_id: &str,
        quantity: i64,
        net_position: f64,
        counters: &mut DailyCounters,
        now: DateTime<Local>,
    ) -> bool {
        match self.check(
            recommendation,
            instrument_id,
            quantity,
            net_position,
            counters,
            now,
        ) {
            Ok(()) => true,
            Err(rejection) => {
                info!(instrument_id, %rejection, "trade vetoed");
                false
            }
        }
    }
}
