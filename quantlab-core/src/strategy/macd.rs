//! MACD histogram crossover.
//!
//! MACD line = EMA(fast) − EMA(slow) over **all** available closes, not just
//! a trailing window. The signal line is approximated as `macd × 0.9` — a
//! deliberate simplification carried over for behavioral parity with the
//! system this engine replays (a true EMA-of-MACD signal line is a future
//! variant, not a silent fix). The histogram therefore reduces to
//! `0.1 × macd`; a sign flip across the two most recent bars triggers.

use super::indicators::ema;
use super::{SignalGenerator, SignalIntent};
use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};

/// Parameters for [`MacdCrossover`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.fast < 1 {
            return Err("fast period must be >= 1");
        }
        if self.slow <= self.fast {
            return Err("slow period must be > fast period");
        }
        Ok(())
    }
}

/// MACD crossover signal generator.
#[derive(Debug, Clone)]
pub struct MacdCrossover {
    params: MacdParams,
}

impl MacdCrossover {
    /// Panics on invalid params; validate beforehand on untrusted input.
    pub fn new(params: MacdParams) -> Self {
        if let Err(reason) = params.validate() {
            panic!("{reason}");
        }
        Self { params }
    }

    /// Histogram at the end of the given close series.
    fn histogram(&self, closes: &[f64]) -> f64 {
        let macd = ema(closes, self.params.fast) - ema(closes, self.params.slow);
        let signal = macd * 0.9;
        macd - signal
    }
}

impl SignalGenerator for MacdCrossover {
    fn name(&self) -> &str {
        "macd"
    }

    fn min_bars(&self) -> usize {
        self.params.slow + self.params.signal_period
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent> {
        let n = bars.len();
        if n < self.min_bars() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let histogram = self.histogram(&closes);
        let prev_histogram = self.histogram(&closes[..n - 1]);

        // Bullish flip: histogram moves from at-or-below zero to above zero.
        if prev_histogram <= 0.0 && histogram > 0.0 {
            return Some(SignalIntent {
                action: TradeAction::Buy,
                reason: "MACD bullish crossover".into(),
            });
        }

        // Bearish flip.
        if prev_histogram >= 0.0 && histogram < 0.0 {
            return Some(SignalIntent {
                action: TradeAction::Sell,
                reason: "MACD bearish crossover".into(),
            });
        }

        None
    }
}
