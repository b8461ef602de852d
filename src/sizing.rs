//! Risk-budget position sizing.

/// Smallest stop distance considered, as a fraction of price.
const MIN_STOP_PCT: f64 = 0.0001;

/// Resolve the ambiguous stop-loss input into a fraction of price.
///
/// Values at or below 1 are already fractions; larger values are absolute
/// price levels whose distance from the last price is taken. Anything
/// unusable falls back to the configured default.
fn resolve_stop_pct(price: f64, stop_loss: Option<f64>, default_pct: f64) -> f64 {
    let pct = stop_loss
        .and_then(|value| {
            if !value.is_finite() || value <= 0.0 {
                None
            } else if value <= 1.0 {
                Some(value)
            } else {
                Some((price - value).abs() / price)
            }
        })
        .filter(|pct| *pct > 0.0)
        .unwrap_or(default_pct);
    pct.max(MIN_STOP_PCT)
}

/// Convert a risk budget into a whole-share quantity.
///
/// Total over all inputs: non-positive price, capital, or risk budget all
/// size to zero instead of failing.
pub fn size_position(
    price: f64,
    capital: f64,
    risk_per_trade: f64,
    stop_loss: Option<f64>,
    default_stop_pct: f64,
) -> i64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    if !capital.is_finite() || capital <= 0.0 {
        return 0;
    }
    if !risk_per_trade.is_finite() || risk_per_trade <= 0.0 {
        return 0;
    }

    let stop_pct = resolve_stop_pct(price, stop_loss, default_stop_pct);
    let max_loss = capital * risk_per_trade;
    let per_share_risk = price * stop_pct;
    if per_share_risk <= 0.0 {
        return 0;
    }
    ((max_loss / per_share_risk).floor() as i64).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_STOP: f64 = 0.05;

    #[test]
    fn sizes_from_percentage_stop() {
        // max loss 2000, per-share risk 1600 * 0.05 = 80
        let quantity = size_position(1600.0, 100_000.0, 0.02, Some(0.05), DEFAULT_STOP);
        assert_eq!(quantity, 25);
    }

    #[test]
    fn sizes_from_absolute_stop() {
        // per-share risk |1600 - 1500| = 100
        let quantity = size_position(1600.0, 100_000.0, 0.02, Some(1500.0), DEFAULT_STOP);
        assert_eq!(quantity, 20);
    }

    #[test]
    fn percentage_and_absolute_forms_agree() {
        let price = 1234.0;
        let pct = 0.04;
        let from_pct = size_position(price, 80_000.0, 0.015, Some(pct), DEFAULT_STOP);
        let from_level = size_position(
            price,
            80_000.0,
            0.015,
            Some(price - price * pct),
            DEFAULT_STOP,
        );
        assert_eq!(from_pct, from_level);
    }

    #[test]
    fn missing_stop_falls_back_to_default() {
        let explicit = size_position(1000.0, 50_000.0, 0.02, Some(DEFAULT_STOP), DEFAULT_STOP);
        let fallback = size_position(1000.0, 50_000.0, 0.02, None, DEFAULT_STOP);
        assert_eq!(explicit, fallback);
    }

    #[test]
    fn stop_at_price_falls_back_to_default() {
        // absolute level equal to price resolves to zero distance
        let quantity = size_position(1000.0, 50_000.0, 0.02, Some(1000.0), DEFAULT_STOP);
        assert_eq!(quantity, size_position(1000.0, 50_000.0, 0.02, None, DEFAULT_STOP));
    }

    #[test]
    fn degenerate_inputs_size_to_zero() {
        assert_eq!(size_position(0.0, 100_000.0, 0.02, Some(0.05), DEFAULT_STOP), 0);
        assert_eq!(size_position(-10.0, 100_000.0, 0.02, None, DEFAULT_STOP), 0);
        assert_eq!(size_position(1600.0, 0.0, 0.02, None, DEFAULT_STOP), 0);
        assert_eq!(size_position(1600.0, -5.0, 0.02, None, DEFAULT_STOP), 0);
        assert_eq!(size_position(1600.0, 100_000.0, 0.0, None, DEFAULT_STOP), 0);
        assert_eq!(size_position(1600.0, 100_000.0, -0.1, None, DEFAULT_STOP), 0);
        assert_eq!(
            size_position(f64::NAN, 100_000.0, 0.02, None, DEFAULT_STOP),
            0
        );
    }

    #[test]
    fn monotonic_in_stop_distance() {
        let mut previous = i64::MAX;
        for stop in [0.01, 0.02, 0.05, 0.1, 0.5] {
            let quantity = size_position(1600.0, 100_000.0, 0.02, Some(stop), DEFAULT_STOP);
            assert!(quantity <= previous);
            previous = quantity;
        }
    }

    #[test]
    fn monotonic_in_risk_budget() {
        let mut previous = 0;
        for risk in [0.005, 0.01, 0.02, 0.05] {
            let quantity = size_position(1600.0, 100_000.0, risk, Some(0.05), DEFAULT_STOP);
            assert!(quantity >= previous);
            previous = quantity;
        }
    }

    #[test]
    fn tiny_stop_is_floored() {
        // epsilon floor keeps the division finite: 200 / (100 * 0.0001)
        let quantity = size_position(100.0, 10_000.0, 0.02, Some(1e-12), DEFAULT_STOP);
        assert_eq!(quantity, 20_000);
    }
}
