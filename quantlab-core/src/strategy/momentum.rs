//! Momentum — trade in the direction of a sufficiently large lookback move.

use super::{SignalGenerator, SignalIntent};
use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};

/// Parameters for [`Momentum`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub lookback: usize,
    pub threshold: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            lookback: 20,
            threshold: 0.05,
        }
    }
}

impl MomentumParams {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.lookback < 2 {
            return Err("lookback must be >= 2");
        }
        if self.threshold <= 0.0 {
            return Err("threshold must be positive");
        }
        Ok(())
    }
}

/// Momentum signal generator.
///
/// Compares the current close against `closes[len − lookback]` — the first
/// close of the trailing `lookback`-bar window, i.e. `lookback − 1` intervals
/// back. This indexing matches the system being replayed and is kept for
/// parity. Buys when the relative change exceeds `+threshold`, sells below
/// `−threshold`.
#[derive(Debug, Clone)]
pub struct Momentum {
    params: MomentumParams,
}

impl Momentum {
    /// Panics on invalid params; validate beforehand on untrusted input.
    pub fn new(params: MomentumParams) -> Self {
        if let Err(reason) = params.validate() {
            panic!("{reason}");
        }
        Self { params }
    }
}

impl SignalGenerator for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn min_bars(&self) -> usize {
        self.params.lookback
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent> {
        let n = bars.len();
        if n < self.min_bars() {
            return None;
        }

        let current = bars[n - 1].close;
        let past = bars[n - self.params.lookback].close;
        if past == 0.0 {
            return None;
        }
        let momentum = (current - past) / past;

        if momentum > self.params.threshold {
            return Some(SignalIntent {
                action: TradeAction::Buy,
                reason: format!("positive momentum: {:.2}%", momentum * 100.0),
            });
        }

        if momentum < -self.params.threshold {
            return Some(SignalIntent {
                action: TradeAction::Sell,
                reason: format!("negative momentum: {:.2}%", momentum * 100.0),
            });
        }

        None
    }
}
