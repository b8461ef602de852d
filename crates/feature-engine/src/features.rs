//! Per-tick feature derivation.
//!
//! All computations are pure; a feature that cannot be derived from the
//! available history is absent, never fabricated as zero.

use serde::Serialize;

use common::MarketSnapshot;

use crate::history::HistoryBuffer;

/// Short moving-average window in ticks.
pub const SHORT_WINDOW: usize = 5;
/// Long moving-average window in ticks.
pub const LONG_WINDOW: usize = 20;

/// Minimum points required before volatility says anything.
const MIN_VOLATILITY_POINTS: usize = 6;
/// Ticks of volume considered for relative volume.
const VOLUME_WINDOW: usize = 10;
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Derived features for one tick. Absent fields mean "no signal".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSet {
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub momentum_pct: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub intraday_return_pct: Option<f64>,
    pub range_position: f64,
    pub relative_volume: f64,
    pub history_depth: usize,
}

impl FeatureSet {
    /// Relative spread of the short moving average over the long one.
    /// Absent until both averages exist.
    pub fn trend_strength(&self) -> Option<f64> {
        match (self.short_ma, self.long_ma) {
            (Some(short), Some(long)) if long != 0.0 => Some((short - long) / long),
            _ => None,
        }
    }
}

/// Derive features for the current tick.
///
/// The buffer must already contain the tick being evaluated, so that feature
/// extraction and strategy scoring observe the same snapshot+history pairing.
pub fn extract_features(snapshot: &MarketSnapshot, history: &HistoryBuffer) -> FeatureSet {
    let closes: Vec<f64> = history.closes().collect();
    let long_window = tail(&closes, LONG_WINDOW);

    let momentum_pct = match (long_window.first(), long_window.last()) {
        (Some(&oldest), Some(&latest)) if oldest != 0.0 => Some((latest - oldest) / oldest),
        _ => None,
    };

    let intraday_return_pct = if snapshot.open != 0.0 {
        Some((snapshot.last_price - snapshot.open) / snapshot.open)
    } else {
        None
    };

    let range_position = if snapshot.high > snapshot.low {
        ((snapshot.last_price - snapshot.low) / (snapshot.high - snapshot.low)).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let volumes: Vec<f64> = history.volumes().filter(|volume| *volume > 0.0).collect();
    let relative_volume = match mean(tail(&volumes, VOLUME_WINDOW)) {
        Some(average) if average > 0.0 => snapshot.volume / average,
        _ => 1.0,
    };

    FeatureSet {
        short_ma: moving_average(&closes, SHORT_WINDOW),
        long_ma: moving_average(&closes, LONG_WINDOW),
        momentum_pct,
        volatility_pct: annualized_volatility(long_window),
        intraday_return_pct,
        range_position,
        relative_volume,
        history_depth: history.len(),
    }
}

fn tail(series: &[f64], window: usize) -> &[f64] {
    &series[series.len().saturating_sub(window)..]
}

fn mean(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(series.iter().sum::<f64>() / series.len() as f64)
}

/// Arithmetic mean of the last `window` values; absent with fewer points.
fn moving_average(series: &[f64], window: usize) -> Option<f64> {
    if series.len() < window {
        return None;
    }
    mean(&series[series.len() - window..])
}

/// Population standard deviation of period-over-period returns, annualized
/// by sqrt(252). Absent with fewer than six points.
fn annualized_volatility(series: &[f64]) -> Option<f64> {
    if series.len() < MIN_VOLATILITY_POINTS {
        return None;
    }
    let returns: Vec<f64> = series
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();
    let mean_return = mean(&returns)?;
    let variance = returns
        .iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(price: f64, open: f64, high: f64, low: f64, volume: f64) -> MarketSnapshot {
        MarketSnapshot {
            instrument_id: "1333".into(),
            symbol: Some("HDFC Bank".into()),
            last_price: price,
            open,
            high,
            low,
            volume,
            timestamp: Utc::now(),
        }
    }

    fn buffer_with_closes(closes: &[f64]) -> HistoryBuffer {
        let mut buffer = HistoryBuffer::default();
        for &close in closes {
            buffer.push(snapshot(close, close, close, close, 1000.0));
        }
        buffer
    }

    #[test]
    fn moving_averages_absent_below_window() {
        let buffer = buffer_with_closes(&[100.0, 101.0, 102.0, 103.0]);
        let features = extract_features(&snapshot(103.0, 100.0, 104.0, 99.0, 1000.0), &buffer);
        assert!(features.short_ma.is_none());
        assert!(features.long_ma.is_none());
    }

    #[test]
    fn short_ma_is_mean_of_last_five_closes() {
        let closes: Vec<f64> = (1..=7).map(|i| i as f64).collect();
        let buffer = buffer_with_closes(&closes);
        let features = extract_features(&snapshot(7.0, 7.0, 7.0, 7.0, 1000.0), &buffer);
        // last five closes: 3, 4, 5, 6, 7
        assert_eq!(features.short_ma, Some(5.0));
        assert!(features.long_ma.is_none());
    }

    #[test]
    fn long_ma_present_at_twenty_closes() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let buffer = buffer_with_closes(&closes);
        let features = extract_features(&snapshot(20.0, 20.0, 20.0, 20.0, 1000.0), &buffer);
        assert_eq!(features.long_ma, Some(10.5));
    }

    #[test]
    fn momentum_spans_the_long_window() {
        let closes: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64).collect();
        let buffer = buffer_with_closes(&closes);
        let features = extract_features(&snapshot(130.0, 130.0, 130.0, 130.0, 1000.0), &buffer);
        // long window starts at close 111 and ends at 130
        let expected = (130.0 - 111.0) / 111.0;
        assert!((features.momentum_pct.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn momentum_absent_when_oldest_close_is_zero() {
        let buffer = buffer_with_closes(&[0.0, 1.0, 2.0]);
        let features = extract_features(&snapshot(2.0, 2.0, 2.0, 2.0, 1000.0), &buffer);
        assert!(features.momentum_pct.is_none());
    }

    #[test]
    fn volatility_requires_six_points() {
        let buffer = buffer_with_closes(&[100.0, 101.0, 99.0, 102.0, 98.0]);
        let features = extract_features(&snapshot(98.0, 98.0, 102.0, 97.0, 1000.0), &buffer);
        assert!(features.volatility_pct.is_none());

        let buffer = buffer_with_closes(&[100.0, 101.0, 99.0, 102.0, 98.0, 103.0]);
        let features = extract_features(&snapshot(103.0, 98.0, 103.0, 97.0, 1000.0), &buffer);
        assert!(features.volatility_pct.unwrap() > 0.0);
    }

    #[test]
    fn volatility_is_zero_for_flat_series() {
        let buffer = buffer_with_closes(&[50.0; 10]);
        let features = extract_features(&snapshot(50.0, 50.0, 50.0, 50.0, 1000.0), &buffer);
        assert_eq!(features.volatility_pct, Some(0.0));
    }

    #[test]
    fn range_position_bounds() {
        let buffer = buffer_with_closes(&[100.0]);

        let features = extract_features(&snapshot(104.0, 100.0, 104.0, 99.0, 1000.0), &buffer);
        assert_eq!(features.range_position, 1.0);

        let features = extract_features(&snapshot(99.0, 100.0, 104.0, 99.0, 1000.0), &buffer);
        assert_eq!(features.range_position, 0.0);

        // degenerate range
        let features = extract_features(&snapshot(100.0, 100.0, 100.0, 100.0, 1000.0), &buffer);
        assert_eq!(features.range_position, 0.5);
    }

    #[test]
    fn relative_volume_defaults_to_one_without_history() {
        let mut buffer = HistoryBuffer::default();
        let current = snapshot(100.0, 100.0, 101.0, 99.0, 5000.0);
        buffer.push(current.clone());
        let features = extract_features(&current, &buffer);
        // only the current tick's volume in the buffer
        assert_eq!(features.relative_volume, 1.0);
    }

    #[test]
    fn relative_volume_uses_recent_average() {
        let mut buffer = HistoryBuffer::default();
        for _ in 0..10 {
            buffer.push(snapshot(100.0, 100.0, 101.0, 99.0, 1000.0));
        }
        let current = snapshot(100.0, 100.0, 101.0, 99.0, 3000.0);
        buffer.push(current.clone());
        let features = extract_features(&current, &buffer);
        // average over the last ten positive volumes: 9 x 1000 + 3000 = 1200
        assert!((features.relative_volume - 2.5).abs() < 1e-12);
    }

    #[test]
    fn intraday_return_guarded_against_zero_open() {
        let buffer = buffer_with_closes(&[100.0]);
        let features = extract_features(&snapshot(100.0, 0.0, 101.0, 99.0, 1000.0), &buffer);
        assert!(features.intraday_return_pct.is_none());
    }

    #[test]
    fn trend_strength_requires_both_averages() {
        let buffer = buffer_with_closes(&[100.0; 10]);
        let features = extract_features(&snapshot(100.0, 100.0, 100.0, 100.0, 1000.0), &buffer);
        assert!(features.short_ma.is_some());
        assert!(features.trend_strength().is_none());

        let buffer = buffer_with_closes(&[100.0; 20]);
        let features = extract_features(&snapshot(100.0, 100.0, 100.0, 100.0, 1000.0), &buffer);
        assert_eq!(features.trend_strength(), Some(0.0));
    }
}
