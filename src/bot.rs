//! Per-tick orchestration of the decision pipeline.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use ai_client::{DecisionRequest, DecisionSource, RiskSummary};
use broker_core::{Brokerage, OrderRequest};
use common::{Action, MarketSnapshot, Position, TradeRecommendation};
use feature_engine::{extract_features, HistoryBuffer};

use crate::config::AppConfig;
use crate::counters::DailyCounters;
use crate::funds::FundsCache;
use crate::journal::{now_iso, TradeJournal};
use crate::risk::TradeGate;

#[derive(Debug, Default)]
struct CycleStats {
    approved: usize,
    vetoed: usize,
    decision_failures: usize,
}

pub struct Bot<B: Brokerage> {
    config: AppConfig,
    broker: B,
    decision_source: Box<dyn DecisionSource>,
    gate: TradeGate,
    counters: DailyCounters,
    funds_cache: FundsCache,
    history: HashMap<String, HistoryBuffer>,
    positions: HashMap<String, Position>,
    journal: TradeJournal,
}

impl<B: Brokerage> Bot<B> {
    pub fn new(
        config: AppConfig,
        broker: B,
        decision_source: Box<dyn DecisionSource>,
        mut journal: TradeJournal,
    ) -> Self {
        journal.write_event(json!({
            "ts": now_iso(),
            "kind": "bot_start",
            "paper_mode": config.trading.paper_mode,
            "instruments": config.instruments.len(),
            "min_confidence": config.risk.min_confidence,
        }));
        info!("journal path: {}", journal.dir().display());

        let gate = TradeGate::new(config.risk.clone());
        let funds_cache = FundsCache::new(config.trading.funds_cache_ttl_secs);
        let counters = DailyCounters::new(Local::now().date_naive());

        Self {
            config,
            broker,
            decision_source,
            gate,
            counters,
            funds_cache,
            history: HashMap::new(),
            positions: HashMap::new(),
            journal,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("bot running...");
        loop {
            if let Err(e) = self.run_cycle().await {
                error!("cycle failed: {:?}", e);
            }
            sleep(Duration::from_millis(self.config.trading.update_interval_ms)).await;
        }
    }

    /// Run a bounded number of cycles; used by the paper-mode replay.
    pub async fn run_cycles(&mut self, cycles: usize) -> Result<()> {
        for _ in 0..cycles {
            if let Err(e) = self.run_cycle().await {
                error!("cycle failed: {:?}", e);
            }
            sleep(Duration::from_millis(self.config.trading.update_interval_ms)).await;
        }
        Ok(())
    }

    pub async fn run_cycle(&mut self) -> Result<()> {
        self.counters.rollover_if_needed(Local::now().date_naive());
        self.refresh_positions().await;

        let snapshots = self.broker.poll().await?;
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "cycle_start",
            "snapshots": snapshots.len(),
            "positions": self.positions.len(),
        }));

        let mut stats = CycleStats::default();
        for snapshot in snapshots {
            if snapshot.instrument_id.is_empty() {
                continue;
            }
            self.process_tick(snapshot, &mut stats).await;
        }

        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "cycle_summary",
            "approved": stats.approved,
            "vetoed": stats.vetoed,
            "decision_failures": stats.decision_failures,
        }));
        Ok(())
    }

    async fn process_tick(&mut self, mut snapshot: MarketSnapshot, stats: &mut CycleStats) {
        if snapshot.symbol.is_none() {
            snapshot.symbol = self.config.resolve_symbol(&snapshot.instrument_id);
        }
        let instrument_id = snapshot.instrument_id.clone();
        let position = self.positions.get(&instrument_id).cloned();
        let net_position = position.as_ref().map(|p| p.net_quantity).unwrap_or(0.0);

        // History advances exactly once per tick, before anything reads it,
        // so features and strategy scoring see the same pairing.
        let lookback = self.config.trading.lookback_ticks;
        let buffer = self
            .history
            .entry(instrument_id.clone())
            .or_insert_with(|| HistoryBuffer::new(lookback));
        buffer.push(snapshot.clone());
        let features = extract_features(&snapshot, buffer);

        let strategy = strategy_engine::select_best_strategy(
            &self.broker,
            &instrument_id,
            &snapshot,
            buffer,
            position.as_ref(),
        )
        .await;
        info!(
            %instrument_id,
            strategy = %strategy.name,
            score = strategy.score,
            confidence = strategy.confidence,
            "option strategy selected"
        );
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "strategy_selected",
            "instrument_id": instrument_id,
            "name": strategy.name,
            "score": strategy.score,
            "confidence": strategy.confidence,
            "top_gap": strategy.diagnostics.top_gap,
        }));

        let request = DecisionRequest {
            request_id: Uuid::new_v4(),
            instrument_id: instrument_id.clone(),
            symbol: snapshot.symbol.clone(),
            snapshot: snapshot.clone(),
            features,
            net_position,
            risk: self.risk_summary(),
        };
        let decision = match self.decision_source.decide(&request).await {
            Ok(decision) => decision,
            Err(e) => {
                stats.decision_failures += 1;
                warn!(%instrument_id, error = %e, "decision source failed; holding");
                self.journal.write_event(json!({
                    "ts": now_iso(),
                    "kind": "decision_error",
                    "instrument_id": instrument_id,
                    "request_id": request.request_id,
                    "error": e.to_string(),
                }));
                TradeRecommendation::hold()
            }
        };
        debug!(%instrument_id, decision = ?decision, "decision received");

        let available_funds = self.available_funds().await;
        let quantity =
            self.gate
                .resolve_quantity(&decision, snapshot.last_price, available_funds, net_position);

        let now = Local::now();
        match self.gate.check(
            &decision,
            &instrument_id,
            quantity,
            net_position,
            &mut self.counters,
            now,
        ) {
            Ok(()) => {
                self.execute(&instrument_id, &snapshot, &decision, quantity, stats)
                    .await;
            }
            Err(rejection) => {
                stats.vetoed += 1;
                if decision.is_actionable() {
                    info!(%instrument_id, %rejection, "trade vetoed");
                }
                self.journal.write_event(json!({
                    "ts": now_iso(),
                    "kind": "decision_vetoed",
                    "instrument_id": instrument_id,
                    "action": decision.action,
                    "confidence": decision.confidence,
                    "quantity": quantity,
                    "reason": rejection.to_string(),
                }));
            }
        }
    }

    async fn execute(
        &mut self,
        instrument_id: &str,
        snapshot: &MarketSnapshot,
        decision: &TradeRecommendation,
        quantity: i64,
        stats: &mut CycleStats,
    ) {
        let order = OrderRequest {
            instrument_id: instrument_id.to_string(),
            action: decision.action,
            quantity,
            price: snapshot.last_price,
            reason: decision.reasoning.clone(),
        };
        info!(
            instrument_id,
            action = ?order.action,
            quantity,
            confidence = decision.confidence,
            reason = %order.reason,
            "executing order"
        );

        match self.broker.execute(&order).await {
            Ok(()) => {
                stats.approved += 1;
                self.counters.record_trade(instrument_id);
                self.apply_local_fill(instrument_id, decision.action, quantity);
                self.funds_cache.invalidate();

                if let Some(stop_loss) = decision.stop_loss {
                    info!(instrument_id, stop_loss, "recommended stop loss");
                }
                if let Some(take_profit) = decision.take_profit {
                    info!(instrument_id, take_profit, "recommended take profit");
                }
                self.journal.write_event(json!({
                    "ts": now_iso(),
                    "kind": "trade_executed",
                    "instrument_id": instrument_id,
                    "action": decision.action,
                    "quantity": quantity,
                    "price": snapshot.last_price,
                    "confidence": decision.confidence,
                    "stop_loss": decision.stop_loss,
                    "take_profit": decision.take_profit,
                }));
            }
            Err(e) => {
                stats.vetoed += 1;
                error!(instrument_id, error = %e, "order placement failed");
                self.journal.write_event(json!({
                    "ts": now_iso(),
                    "kind": "order_failed",
                    "instrument_id": instrument_id,
                    "error": e.to_string(),
                }));
            }
        }
    }

    /// Conservative local position update to avoid over-trading before the
    /// next position refresh.
    fn apply_local_fill(&mut self, instrument_id: &str, action: Action, quantity: i64) {
        let position = self
            .positions
            .entry(instrument_id.to_string())
            .or_insert_with(|| Position {
                instrument_id: instrument_id.to_string(),
                ..Position::default()
            });
        match action {
            Action::Buy => position.net_quantity += quantity as f64,
            Action::Sell => position.net_quantity -= quantity as f64,
            Action::Hold => {}
        }
    }

    async fn refresh_positions(&mut self) {
        match self.broker.positions().await {
            Ok(positions) => self.positions = positions,
            Err(e) => warn!(error = %e, "position refresh failed; keeping last known"),
        }
    }

    async fn available_funds(&mut self) -> Option<f64> {
        if let Some(amount) = self.funds_cache.get() {
            return Some(amount);
        }
        match self.broker.available_funds().await {
            Ok(amount) => {
                self.funds_cache.store(amount);
                self.funds_cache.get()
            }
            Err(e) => {
                error!(error = %e, "unable to fetch available funds");
                None
            }
        }
    }

    fn risk_summary(&self) -> RiskSummary {
        let risk = &self.config.risk;
        RiskSummary {
            min_confidence: risk.min_confidence,
            risk_per_trade: risk.risk_per_trade,
            max_position_size: risk.max_position_size,
            stop_loss_percent: risk.stop_loss_percent,
            take_profit_percent: risk.take_profit_percent,
            max_daily_trades: risk.max_daily_trades,
        }
    }
}
