//! Strategy catalog and recommendation types.

use serde::Serialize;

/// What a leg does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegAction {
    Buy,
    Sell,
    Hold,
}

/// Contract type of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentKind {
    Call,
    Put,
    Stock,
}

/// Strike placement relative to the underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Moneyness {
    Itm,
    Atm,
    Otm,
    /// Further OTM on the put side.
    LowerOtm,
    /// Further OTM on the call side.
    HigherOtm,
    /// The underlying itself, for stock legs.
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Moderate,
    Neutral,
    Aggressive,
    /// Sentinel recommendations carry no profile.
    Unrated,
}

/// Directional/volatility assumption that selects the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyBias {
    Bullish,
    BullishRiskOff,
    Bearish,
    BearishIncome,
    BullishIncome,
    RangeBound,
    RangeBoundTight,
    VolatilityExpansion,
}

/// One leg of a multi-leg structure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrategyLeg {
    pub action: LegAction,
    pub instrument: InstrumentKind,
    pub moneyness: Moneyness,
    pub quantity: u32,
    pub note: &'static str,
}

/// Static catalog entry; read-only configuration, not derived state.
#[derive(Debug, Clone, Copy)]
pub struct StrategyDefinition {
    pub name: &'static str,
    pub risk_profile: RiskProfile,
    pub bias: StrategyBias,
    pub legs: &'static [StrategyLeg],
}

impl StrategyDefinition {
    /// Whether the structure assumes stock is already held (a HOLD stock leg).
    pub fn presumes_long_underlying(&self) -> bool {
        self.legs
            .iter()
            .any(|leg| leg.action == LegAction::Hold && leg.instrument == InstrumentKind::Stock)
    }
}

/// Inputs echoed back with every recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreDiagnostics {
    pub trend_strength: f64,
    pub momentum_pct: f64,
    pub volatility_pct: f64,
    pub intraday_return_pct: f64,
    pub range_position: f64,
    pub relative_volume: f64,
    pub swing_range_pct: f64,
    /// Distance to the best competing score; filled in by select/rank.
    pub top_gap: f64,
}

/// Outcome of evaluating one catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyRecommendation {
    pub name: String,
    pub score: f64,
    pub confidence: f64,
    pub rationale: String,
    pub risk_profile: RiskProfile,
    pub expected_move: String,
    pub legs: Vec<StrategyLeg>,
    pub diagnostics: ScoreDiagnostics,
}

impl StrategyRecommendation {
    /// Sentinel returned when the catalog yields nothing.
    pub fn no_strategy() -> Self {
        Self {
            name: "No Strategy".into(),
            score: 0.0,
            confidence: 0.0,
            rationale: "Insufficient data to evaluate strategies.".into(),
            risk_profile: RiskProfile::Unrated,
            expected_move: "Neutral outlook".into(),
            legs: Vec::new(),
            diagnostics: ScoreDiagnostics::default(),
        }
    }
}
