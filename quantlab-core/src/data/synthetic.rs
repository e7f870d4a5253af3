//! Deterministic synthetic price series for tests and benches.

use crate::domain::Bar;
use chrono::{Duration, NaiveDate};

/// Build `n` daily bars with a gentle upward drift and a sine oscillation.
///
/// The oscillation is wide enough to trip crossover and band strategies, so
/// a default-parameter backtest over a few hundred bars produces trades.
/// Fully deterministic: same inputs, same bars.
pub fn synthetic_bars(symbol: &str, start: NaiveDate, n: usize, base_price: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = base_price * (1.0 + 0.0008 * t + 0.04 * (t * 0.18).sin());
            let open = base_price * (1.0 + 0.0008 * t + 0.04 * ((t - 1.0) * 0.18).sin());
            let high = close.max(open) * 1.005;
            let low = close.min(open) * 0.995;
            Bar {
                symbol: symbol.to_string(),
                date: start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1_000 + (i as u64 % 7) * 100,
            }
        })
        .collect()
}

/// Build bars from an explicit close series (one bar per close, consecutive days).
pub fn bars_from_closes(symbol: &str, start: NaiveDate, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            symbol: symbol.to_string(),
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: (close - 1.0).max(0.01),
            close,
            volume: 1_000,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn synthetic_bars_are_deterministic() {
        let a = synthetic_bars("SPY", start(), 100, 100.0);
        let b = synthetic_bars("SPY", start(), 100, 100.0);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.close, y.close);
            assert_eq!(x.date, y.date);
        }
    }

    #[test]
    fn synthetic_bars_are_sane() {
        for bar in synthetic_bars("SPY", start(), 250, 100.0) {
            assert!(bar.is_sane(), "insane bar at {}", bar.date);
        }
    }

    #[test]
    fn bars_from_closes_preserves_values() {
        let bars = bars_from_closes("SPY", start(), &[10.0, 10.0, 10.0, 12.0, 14.0]);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[3].close, 12.0);
        assert_eq!(bars[4].date, start() + Duration::days(4));
    }
}
