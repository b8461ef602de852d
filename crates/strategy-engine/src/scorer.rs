//! Heuristic scoring of the strategy catalog.

use broker_core::HistoricalDataSource;
use common::{MarketSnapshot, Position};
use feature_engine::{extract_features, FeatureSet, HistoryBuffer};

use crate::catalog::CATALOG;
use crate::swing::{fetch_swing_context, SwingContext};
use crate::types::{
    ScoreDiagnostics, StrategyBias, StrategyDefinition, StrategyRecommendation,
};

/// Score at which confidence saturates.
const CONFIDENCE_CEILING: f64 = 200.0;
/// Cap on the linear region of the confidence map.
const CONFIDENCE_CAP: f64 = 0.95;
/// |trend| below this earns no generic trend bonus.
const TREND_DEADBAND: f64 = 0.02;

/// Saturating map from raw score to confidence.
pub fn score_to_confidence(score: f64) -> f64 {
    if score <= 0.0 {
        0.0
    } else if score >= CONFIDENCE_CEILING {
        0.99
    } else {
        (score / CONFIDENCE_CEILING).min(CONFIDENCE_CAP)
    }
}

/// Score one catalog entry against a feature context.
///
/// Pure: identical inputs always produce the identical recommendation.
pub fn score_strategy(
    definition: &StrategyDefinition,
    features: &FeatureSet,
    swing: Option<&SwingContext>,
    net_position: f64,
) -> StrategyRecommendation {
    let trend = features.trend_strength().unwrap_or(0.0);
    let momentum = features.momentum_pct.unwrap_or(0.0);
    let volatility = features.volatility_pct.unwrap_or(0.0);
    let intraday = features.intraday_return_pct.unwrap_or(0.0);
    let relative_volume = features.relative_volume;
    let swing_range = swing.map(|s| s.swing_range_pct).unwrap_or(0.0);
    let recent_direction = swing.map(|s| s.recent_direction).unwrap_or(0.0);

    let mut score = 0.0;
    let mut rationale: Vec<&str> = Vec::new();

    // Generic terms shared by every bias.
    if trend.abs() > TREND_DEADBAND {
        score += 10.0 * trend.abs();
    }
    score += 5.0 * relative_volume;
    score += 5.0 * swing_range.clamp(0.0, 0.2);

    let raw = match definition.bias {
        StrategyBias::Bullish => {
            let raw = (trend + momentum + intraday) * 100.0;
            if raw > 0.0 {
                rationale.push("Bullish momentum and trend detected");
            }
            if net_position > 0.0 {
                score += 15.0;
                rationale.push("Existing long position enables income overlay");
            }
            raw
        }
        StrategyBias::BullishRiskOff => {
            let raw = (trend + recent_direction) * 80.0 - volatility * 20.0;
            if raw > 0.0 {
                rationale.push("Uptrend with desire for downside protection");
            }
            raw
        }
        StrategyBias::Bearish => {
            let raw = (-(trend + momentum) - intraday) * 90.0;
            if raw > 0.0 {
                rationale.push("Bearish momentum warrants downside exposure");
            }
            raw
        }
        StrategyBias::BearishIncome => {
            let raw = -(trend + momentum) + volatility * 30.0;
            if raw > 0.0 {
                rationale.push("Bearish lean with elevated volatility for premium");
            }
            raw
        }
        StrategyBias::BullishIncome => {
            let raw = (trend + momentum) * 70.0 + (0.05 - intraday.abs()).max(0.0) * 50.0;
            if raw > 0.0 {
                rationale.push("Bullish bias with controlled volatility");
            }
            raw
        }
        StrategyBias::RangeBound => {
            let mut raw = (0.06 - trend.abs()).max(0.0) * 80.0
                + (0.06 - momentum.abs()).max(0.0) * 60.0;
            raw += (0.05 - swing_range).max(0.0) * 40.0;
            raw -= volatility * 15.0;
            if raw > 0.0 {
                rationale.push("Range-bound conditions favour short premium structures");
            }
            raw
        }
        StrategyBias::RangeBoundTight => {
            let raw = (0.04 - trend.abs()).max(0.0) * 90.0
                + (0.04 - momentum.abs()).max(0.0) * 70.0
                - volatility * 20.0;
            if raw > 0.0 {
                rationale.push("Very tight range suggests short ATM premium");
            }
            raw
        }
        StrategyBias::VolatilityExpansion => {
            let mut raw = volatility * 120.0 + relative_volume * 10.0;
            if swing_range > 0.08 {
                raw += swing_range * 40.0;
            }
            if raw > 0.0 {
                rationale.push("Elevated volatility regime supports long gamma strategies");
            }
            raw
        }
    };
    score += raw;

    // Structures that presume held stock lose points without it.
    if definition.presumes_long_underlying() && net_position <= 0.0 {
        match definition.bias {
            StrategyBias::BullishRiskOff => {
                score -= 15.0;
                rationale.push("Best suited for long equity exposure");
            }
            _ => {
                score -= 50.0;
                rationale.push("Requires existing long shares");
            }
        }
    }

    let rationale = if rationale.is_empty() {
        "Strategy aligns with quantitative signals.".to_string()
    } else {
        rationale.join("; ")
    };

    StrategyRecommendation {
        name: definition.name.to_string(),
        score,
        confidence: score_to_confidence(score),
        rationale,
        risk_profile: definition.risk_profile,
        expected_move: expected_move(definition.bias, volatility),
        legs: definition.legs.to_vec(),
        diagnostics: ScoreDiagnostics {
            trend_strength: trend,
            momentum_pct: momentum,
            volatility_pct: volatility,
            intraday_return_pct: intraday,
            range_position: features.range_position,
            relative_volume,
            swing_range_pct: swing_range,
            top_gap: 0.0,
        },
    }
}

fn expected_move(bias: StrategyBias, volatility: f64) -> String {
    match bias {
        StrategyBias::Bullish | StrategyBias::BullishIncome | StrategyBias::BullishRiskOff => {
            "Upside continuation expected"
        }
        StrategyBias::Bearish | StrategyBias::BearishIncome => "Downside continuation expected",
        StrategyBias::RangeBound | StrategyBias::RangeBoundTight => {
            "Price expected to stay within a range"
        }
        StrategyBias::VolatilityExpansion => {
            if volatility > 0.4 {
                "Major volatility spike anticipated"
            } else {
                "Volatility expansion expected"
            }
        }
    }
    .to_string()
}

/// Evaluate the whole catalog, sorted by score descending.
///
/// The sort is stable, so catalog order breaks ties. Every entry is annotated
/// with its gap to the top score; the leader carries its lead over the
/// runner-up instead.
pub fn rank_with_context(
    features: &FeatureSet,
    swing: Option<&SwingContext>,
    net_position: f64,
) -> Vec<StrategyRecommendation> {
    let mut recommendations: Vec<StrategyRecommendation> = CATALOG
        .iter()
        .map(|definition| score_strategy(definition, features, swing, net_position))
        .collect();
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    annotate_top_gap(&mut recommendations);
    recommendations
}

/// Highest-scoring entry, or the sentinel when the catalog yields nothing.
pub fn best_with_context(
    features: &FeatureSet,
    swing: Option<&SwingContext>,
    net_position: f64,
) -> StrategyRecommendation {
    rank_with_context(features, swing, net_position)
        .into_iter()
        .next()
        .unwrap_or_else(StrategyRecommendation::no_strategy)
}

fn annotate_top_gap(recommendations: &mut [StrategyRecommendation]) {
    let top = match recommendations.first() {
        Some(best) => best.score,
        None => return,
    };
    let runner_up = recommendations.get(1).map(|rec| rec.score).unwrap_or(top);
    if let Some(best) = recommendations.first_mut() {
        best.diagnostics.top_gap = top - runner_up;
    }
    for rec in recommendations.iter_mut().skip(1) {
        rec.diagnostics.top_gap = top - rec.score;
    }
}

/// Evaluate the catalog for a live tick, pulling optional swing context from
/// the historical source, and return the top recommendation.
pub async fn select_best_strategy(
    historical: &dyn HistoricalDataSource,
    instrument_id: &str,
    snapshot: &MarketSnapshot,
    history: &HistoryBuffer,
    position: Option<&Position>,
) -> StrategyRecommendation {
    let features = extract_features(snapshot, history);
    let swing = fetch_swing_context(historical, instrument_id).await;
    let net_position = position.map(|p| p.net_quantity).unwrap_or(0.0);
    best_with_context(&features, swing.as_ref(), net_position)
}

/// Evaluate the catalog for a live tick and return the full ranking.
pub async fn rank_strategies(
    historical: &dyn HistoricalDataSource,
    instrument_id: &str,
    snapshot: &MarketSnapshot,
    history: &HistoryBuffer,
    position: Option<&Position>,
) -> Vec<StrategyRecommendation> {
    let features = extract_features(snapshot, history);
    let swing = fetch_swing_context(historical, instrument_id).await;
    let net_position = position.map(|p| p.net_quantity).unwrap_or(0.0);
    rank_with_context(&features, swing.as_ref(), net_position)
}
