//! Decision request/response types.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{MarketSnapshot, TradeRecommendation};
use feature_engine::FeatureSet;

/// Context shipped to the decision source for one instrument tick.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRequest {
    pub request_id: Uuid,
    pub instrument_id: String,
    pub symbol: Option<String>,
    pub snapshot: MarketSnapshot,
    pub features: FeatureSet,
    pub net_position: f64,
    pub risk: RiskSummary,
}

/// The risk rules the decision source is asked to respect.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub min_confidence: f64,
    pub risk_per_trade: f64,
    pub max_position_size: i64,
    pub stop_loss_percent: f64,
    pub take_profit_percent: f64,
    pub max_daily_trades: u32,
}

/// Raw decision payload as the decision source is asked to emit it.
///
/// Every field defaults so a partially-formed object still deserializes;
/// range enforcement happens during normalization, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionPayload {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timeout")]
    Timeout,

    #[error("response missing text content")]
    MissingContent,

    #[error("no JSON object found in decision text")]
    MissingJson,
}

/// Produces a normalized recommendation for a tick. Implementations are
/// allowed to fail; callers degrade to HOLD.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    async fn decide(
        &self,
        request: &DecisionRequest,
    ) -> Result<TradeRecommendation, DecisionError>;
}
