//! SMA crossover — golden cross and death cross detection on closes.
//!
//! Compares the fast/slow simple moving averages on the current window
//! against the same averages one bar back. Only strict transitions fire:
//! equality on the previous bar counts as "not yet crossed".

use super::indicators::sma;
use super::{SignalGenerator, SignalIntent};
use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};

/// Parameters for [`SmaCrossover`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for SmaCrossoverParams {
    fn default() -> Self {
        Self {
            fast_period: 20,
            slow_period: 50,
        }
    }
}

impl SmaCrossoverParams {
    /// Check the period relationship without building a generator.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.fast_period < 1 {
            return Err("fast_period must be >= 1");
        }
        if self.slow_period <= self.fast_period {
            return Err("slow_period must be > fast_period");
        }
        Ok(())
    }
}

/// SMA crossover signal generator.
///
/// Buys when the fast SMA crosses from at-or-below the slow SMA to strictly
/// above it; sells on the opposite crossing. Requires `slow_period + 1` bars
/// so both the current and the one-bar-shifted averages cover full windows.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    params: SmaCrossoverParams,
}

impl SmaCrossover {
    /// Panics on invalid params; validate beforehand on untrusted input.
    pub fn new(params: SmaCrossoverParams) -> Self {
        if let Err(reason) = params.validate() {
            panic!("{reason}");
        }
        Self { params }
    }
}

impl SignalGenerator for SmaCrossover {
    fn name(&self) -> &str {
        "sma_crossover"
    }

    fn min_bars(&self) -> usize {
        self.params.slow_period + 1
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent> {
        let n = bars.len();
        if n < self.min_bars() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = self.params.fast_period;
        let slow = self.params.slow_period;

        let fast_sma = sma(&closes[n - fast..]);
        let slow_sma = sma(&closes[n - slow..]);
        let prev_fast_sma = sma(&closes[n - 1 - fast..n - 1]);
        let prev_slow_sma = sma(&closes[n - 1 - slow..n - 1]);

        // Golden cross: fast moves from at-or-below to strictly above.
        if prev_fast_sma <= prev_slow_sma && fast_sma > slow_sma {
            return Some(SignalIntent {
                action: TradeAction::Buy,
                reason: format!("SMA crossover: {fast} crossed above {slow}"),
            });
        }

        // Death cross: fast moves from at-or-above to strictly below.
        if prev_fast_sma >= prev_slow_sma && fast_sma < slow_sma {
            return Some(SignalIntent {
                action: TradeAction::Sell,
                reason: format!("SMA crossover: {fast} crossed below {slow}"),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "AAPL".into(),
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn generator(fast: usize, slow: usize) -> SmaCrossover {
        SmaCrossover::new(SmaCrossoverParams {
            fast_period: fast,
            slow_period: slow,
        })
    }

    #[test]
    fn fires_buy_on_golden_cross() {
        // Flat at 10, then a jump to 12: at the 4-bar window the fast SMA(2)
        // overtakes the slow SMA(3) while the shifted SMAs were tied.
        let bars = make_bars(&[10.0, 10.0, 10.0, 12.0]);
        let sig = generator(2, 3);

        let intent = sig.evaluate(&bars).expect("expected a buy signal");
        assert_eq!(intent.action, TradeAction::Buy);
        assert!(
            intent.reason.contains("crossed above"),
            "reason should mention the crossover: {}",
            intent.reason
        );
    }

    #[test]
    fn no_refire_after_cross_established() {
        // One bar later the fast SMA is already above: no new signal.
        let bars = make_bars(&[10.0, 10.0, 10.0, 12.0, 14.0]);
        let sig = generator(2, 3);
        assert!(sig.evaluate(&bars).is_none());
    }

    #[test]
    fn fires_sell_on_death_cross() {
        let bars = make_bars(&[10.0, 10.0, 10.0, 8.0]);
        let sig = generator(2, 3);

        let intent = sig.evaluate(&bars).expect("expected a sell signal");
        assert_eq!(intent.action, TradeAction::Sell);
        assert!(intent.reason.contains("crossed below"));
    }

    #[test]
    fn equality_does_not_fire() {
        // Perfectly flat closes: fast == slow on every window.
        let bars = make_bars(&[10.0; 12]);
        let sig = generator(2, 3);
        assert!(sig.evaluate(&bars).is_none());
    }

    #[test]
    fn short_window_returns_none() {
        let bars = make_bars(&[10.0, 10.0, 10.0]);
        let sig = generator(2, 3); // min_bars = 4
        assert!(sig.evaluate(&bars).is_none());
    }

    #[test]
    fn min_bars_covers_shifted_window() {
        let sig = generator(20, 50);
        assert_eq!(sig.min_bars(), 51);
    }

    #[test]
    #[should_panic(expected = "slow_period must be > fast_period")]
    fn rejects_slow_leq_fast() {
        generator(50, 10);
    }

    #[test]
    #[should_panic(expected = "fast_period must be >= 1")]
    fn rejects_zero_fast_period() {
        generator(0, 10);
    }
}
