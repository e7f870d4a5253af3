//! RSI reversal — buy oversold, sell overbought.

use super::indicators::rsi;
use super::{SignalGenerator, SignalIntent};
use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};

/// Parameters for [`RsiReversal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl RsiParams {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.period < 1 {
            return Err("period must be >= 1");
        }
        if self.oversold >= self.overbought {
            return Err("oversold threshold must be below overbought threshold");
        }
        Ok(())
    }
}

/// RSI oversold/overbought signal generator.
///
/// Uses the Wilder-style simple average of the trailing `period` gains and
/// losses (see [`indicators::rsi`](super::indicators::rsi)). Buys below the
/// oversold threshold, sells above the overbought threshold.
#[derive(Debug, Clone)]
pub struct RsiReversal {
    params: RsiParams,
}

impl RsiReversal {
    /// Panics on invalid params; validate beforehand on untrusted input.
    pub fn new(params: RsiParams) -> Self {
        if let Err(reason) = params.validate() {
            panic!("{reason}");
        }
        Self { params }
    }
}

impl SignalGenerator for RsiReversal {
    fn name(&self) -> &str {
        "rsi_oversold"
    }

    fn min_bars(&self) -> usize {
        self.params.period + 1
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let value = rsi(&closes, self.params.period);

        if value < self.params.oversold {
            return Some(SignalIntent {
                action: TradeAction::Buy,
                reason: format!("RSI oversold: {value:.2}"),
            });
        }

        if value > self.params.overbought {
            return Some(SignalIntent {
                action: TradeAction::Sell,
                reason: format!("RSI overbought: {value:.2}"),
            });
        }

        None
    }
}
