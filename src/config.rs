//! Bot configuration, loaded once from TOML.

use chrono::NaiveTime;
use serde::Deserialize;

use ai_client::AiStudioConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiStudioConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    /// Instruments to monitor, with optional display symbols.
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    pub instrument_id: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Pause between ticks of the control loop.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Ticks of history retained per instrument.
    #[serde(default = "default_lookback_ticks")]
    pub lookback_ticks: usize,
    /// Seconds before a cached funds read must be refreshed.
    #[serde(default = "default_funds_cache_ttl_secs")]
    pub funds_cache_ttl_secs: u64,
    /// Simulate fills against an in-memory broker instead of a live venue.
    #[serde(default = "default_true")]
    pub paper_mode: bool,
    #[serde(default = "default_paper_starting_funds")]
    pub paper_starting_funds: f64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            lookback_ticks: default_lookback_ticks(),
            funds_cache_ttl_secs: default_funds_cache_ttl_secs(),
            paper_mode: true,
            paper_starting_funds: default_paper_starting_funds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Decisions below this confidence never execute.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Fraction of capital at risk per trade.
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: f64,
    /// Max net quantity held per instrument.
    #[serde(default = "default_max_position_size")]
    pub max_position_size: i64,
    /// Fallback stop distance as a fraction of price.
    #[serde(default = "default_stop_loss_percent")]
    pub stop_loss_percent: f64,
    #[serde(default = "default_take_profit_percent")]
    pub take_profit_percent: f64,
    /// Aggregate trades allowed per calendar day. Zero disables the cap.
    #[serde(default = "default_max_daily_trades")]
    pub max_daily_trades: u32,
    /// Per-instrument trades allowed per calendar day, defaulted on its own
    /// rather than borrowed from the aggregate cap. Zero disables the cap.
    #[serde(default = "default_max_trades_per_symbol")]
    pub max_trades_per_symbol: u32,
    #[serde(default)]
    pub trading_hours: TradingHoursConfig,
    #[serde(default)]
    pub allow_short_selling: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            risk_per_trade: default_risk_per_trade(),
            max_position_size: default_max_position_size(),
            stop_loss_percent: default_stop_loss_percent(),
            take_profit_percent: default_take_profit_percent(),
            max_daily_trades: default_max_daily_trades(),
            max_trades_per_symbol: default_max_trades_per_symbol(),
            trading_hours: TradingHoursConfig::default(),
            allow_short_selling: false,
        }
    }
}

/// Session window in "HH:MM" local time. A window that fails to parse is
/// treated as always open.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingHoursConfig {
    #[serde(default = "default_session_start")]
    pub start: String,
    #[serde(default = "default_session_end")]
    pub end: String,
}

impl Default for TradingHoursConfig {
    fn default() -> Self {
        Self {
            start: default_session_start(),
            end: default_session_end(),
        }
    }
}

impl TradingHoursConfig {
    fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(self.start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(self.end.trim(), "%H:%M").ok()?;
        Some((start, end))
    }

    pub fn contains(&self, now: NaiveTime) -> bool {
        match self.window() {
            Some((start, end)) => start <= now && now <= end,
            None => true,
        }
    }
}

fn default_update_interval_ms() -> u64 {
    5_000
}

fn default_lookback_ticks() -> usize {
    120
}

fn default_funds_cache_ttl_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_paper_starting_funds() -> f64 {
    100_000.0
}

fn default_min_confidence() -> f64 {
    0.7
}

fn default_risk_per_trade() -> f64 {
    0.02
}

fn default_max_position_size() -> i64 {
    1_000
}

fn default_stop_loss_percent() -> f64 {
    0.05
}

fn default_take_profit_percent() -> f64 {
    0.1
}

fn default_max_daily_trades() -> u32 {
    10
}

fn default_max_trades_per_symbol() -> u32 {
    10
}

fn default_session_start() -> String {
    "09:15".into()
}

fn default_session_end() -> String {
    "15:30".into()
}

impl AppConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Display symbol for an instrument, when configured.
    pub fn resolve_symbol(&self, instrument_id: &str) -> Option<String> {
        self.instruments
            .iter()
            .find(|instrument| instrument.instrument_id == instrument_id)
            .and_then(|instrument| instrument.symbol.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai: AiStudioConfig::default(),
            trading: TradingConfig::default(),
            risk: RiskConfig::default(),
            instruments: Vec::new(),
        }
    }
}
