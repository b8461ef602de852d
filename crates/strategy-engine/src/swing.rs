//! Swing metrics over recent daily candles.

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;

use broker_core::HistoricalDataSource;
use common::Candle;

/// Calendar days of daily candles considered for swing metrics.
pub const SWING_LOOKBACK_DAYS: i64 = 21;

/// Fewer closes than this and the window says nothing.
const MIN_SWING_POINTS: usize = 5;

/// Swing extremes and drift over the recent lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingContext {
    pub swing_high: f64,
    pub swing_low: f64,
    pub swing_range_pct: f64,
    pub recent_direction: f64,
}

impl SwingContext {
    /// Build from daily candles; `None` when there is too little to work with.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let closes: Vec<f64> = candles.iter().map(|candle| candle.close).collect();
        if closes.len() < MIN_SWING_POINTS {
            return None;
        }

        let swing_high = closes.iter().cloned().fold(f64::MIN, f64::max);
        let swing_low = closes.iter().cloned().fold(f64::MAX, f64::min);
        let swing_range_pct = if swing_low != 0.0 {
            (swing_high - swing_low) / swing_low
        } else {
            0.0
        };
        let first = closes[0];
        let last = closes[closes.len() - 1];
        let recent_direction = if first != 0.0 { (last - first) / first } else { 0.0 };

        Some(Self {
            swing_high,
            swing_low,
            swing_range_pct,
            recent_direction,
        })
    }
}

/// Pull swing context from the historical source, degrading to `None` on any
/// failure or thin data. Evaluation never fails because history is missing.
pub async fn fetch_swing_context(
    source: &dyn HistoricalDataSource,
    instrument_id: &str,
) -> Option<SwingContext> {
    let to = Utc::now().date_naive();
    let from = to - Duration::days(SWING_LOOKBACK_DAYS);
    match source.daily_candles(instrument_id, from, to).await {
        Ok(candles) => SwingContext::from_candles(&candles),
        Err(e) => {
            debug!(instrument_id, error = %e, "historical data fetch failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candle(day: u32, close: f64) -> Candle {
        Candle {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000.0,
        }
    }

    #[test]
    fn too_few_closes_yield_nothing() {
        let candles: Vec<Candle> = (1..=4).map(|day| candle(day, 100.0)).collect();
        assert!(SwingContext::from_candles(&candles).is_none());
    }

    #[test]
    fn swing_metrics_from_closes() {
        let closes = [100.0, 110.0, 95.0, 105.0, 120.0];
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| candle(i as u32 + 1, close))
            .collect();

        let swing = SwingContext::from_candles(&candles).unwrap();
        assert_eq!(swing.swing_high, 120.0);
        assert_eq!(swing.swing_low, 95.0);
        assert!((swing.swing_range_pct - (120.0 - 95.0) / 95.0).abs() < 1e-12);
        assert!((swing.recent_direction - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_low_guards_division() {
        let closes = [0.0, 1.0, 2.0, 3.0, 4.0];
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| candle(i as u32 + 1, close))
            .collect();

        let swing = SwingContext::from_candles(&candles).unwrap();
        assert_eq!(swing.swing_range_pct, 0.0);
        assert_eq!(swing.recent_direction, 0.0);
    }
}
