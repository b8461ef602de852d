//! Unified error type for the bot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("broker API error (status={status}): {message}")]
    BrokerApi { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("risk check failed: {0}")]
    RiskViolation(String),

    #[error("instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("stale data: {0}")]
    StaleData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
