mod bot;
mod config;
mod counters;
mod funds;
mod journal;
mod risk;
mod sizing;

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use tracing::{info, warn};

use ai_client::{AiStudioClient, DecisionSource, ScriptedDecisionSource};
use broker_core::PaperBroker;
use common::MarketSnapshot;

use bot::Bot;
use config::AppConfig;
use journal::{resolve_journal_dir, TradeJournal};

/// Ticks replayed per instrument in a paper session.
const PAPER_SESSION_TICKS: usize = 30;

#[derive(Debug, Parser)]
#[command(name = "ai-intraday-bot", about = "AI-assisted intraday trading bot")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    info!("loaded configuration from {}", cli.config);

    if config.instruments.is_empty() {
        bail!("no instruments configured; add [[instruments]] entries to {}", cli.config);
    }
    if !config.trading.paper_mode {
        bail!("live brokerage adapter is not configured; set trading.paper_mode = true");
    }

    let decision_source: Box<dyn DecisionSource> = match std::env::var("AI_STUDIO_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            info!("decision source: AI Studio ({})", config.ai.model);
            Box::new(AiStudioClient::new(config.ai.clone(), api_key)?)
        }
        _ => {
            warn!("AI_STUDIO_API_KEY not set; decision source will hold on every tick");
            Box::new(ScriptedDecisionSource::idle())
        }
    };

    let broker = seed_paper_broker(&config);
    let journal = TradeJournal::open(resolve_journal_dir())?;

    let mut bot = Bot::new(config, broker, decision_source, journal);
    bot.run_cycles(PAPER_SESSION_TICKS).await?;
    info!("paper session complete");
    Ok(())
}

/// Paper session data: a gentle uptrend with a volume burst near the end,
/// enough history for every feature window to fill in.
fn seed_paper_broker(config: &AppConfig) -> PaperBroker {
    let mut broker = PaperBroker::new(config.trading.paper_starting_funds);
    let session_open = Utc::now();

    for tick in 0..PAPER_SESSION_TICKS {
        let mut batch = Vec::with_capacity(config.instruments.len());
        for (slot, instrument) in config.instruments.iter().enumerate() {
            let base = 1_000.0 + 250.0 * slot as f64;
            let drift = base * 0.001 * tick as f64;
            let price = base + drift;
            let volume = if tick > PAPER_SESSION_TICKS - 5 {
                12_000.0
            } else {
                5_000.0
            };
            batch.push(MarketSnapshot {
                instrument_id: instrument.instrument_id.clone(),
                symbol: instrument.symbol.clone(),
                last_price: price,
                open: base,
                high: price * 1.005,
                low: base * 0.995,
                volume,
                timestamp: session_open + Duration::seconds(tick as i64 * 5),
            });
        }
        broker.push_batch(batch);
    }
    broker
}
