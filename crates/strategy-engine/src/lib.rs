//! Option-structure catalog and heuristic strategy scoring.

mod catalog;
mod scorer;
mod swing;
mod types;

pub use catalog::CATALOG;
pub use scorer::{
    best_with_context, rank_strategies, rank_with_context, score_strategy, score_to_confidence,
    select_best_strategy,
};
pub use swing::{fetch_swing_context, SwingContext, SWING_LOOKBACK_DAYS};
pub use types::{
    InstrumentKind, LegAction, Moneyness, RiskProfile, ScoreDiagnostics, StrategyBias,
    StrategyDefinition, StrategyLeg, StrategyRecommendation,
};
