//! Mean reversion — trade against excursions beyond standard-deviation bands.

use super::indicators::{sma, std_dev_population};
use super::{SignalGenerator, SignalIntent};
use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};

/// Parameters for [`MeanReversion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionParams {
    pub period: usize,
    pub std_devs: f64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_devs: 2.0,
        }
    }
}

impl MeanReversionParams {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.period < 2 {
            return Err("period must be >= 2");
        }
        if self.std_devs <= 0.0 {
            return Err("std_devs must be positive");
        }
        Ok(())
    }
}

/// Mean reversion signal generator.
///
/// Computes the mean and population standard deviation of the last `period`
/// closes. Buys when the current close sits below `mean − std_devs·σ`, sells
/// when above `mean + std_devs·σ`.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    params: MeanReversionParams,
}

impl MeanReversion {
    /// Panics on invalid params; validate beforehand on untrusted input.
    pub fn new(params: MeanReversionParams) -> Self {
        if let Err(reason) = params.validate() {
            panic!("{reason}");
        }
        Self { params }
    }
}

impl SignalGenerator for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn min_bars(&self) -> usize {
        self.params.period
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent> {
        let n = bars.len();
        if n < self.min_bars() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let recent = &closes[n - self.params.period..];
        let mean = sma(recent);
        let std = std_dev_population(recent);

        let current = closes[n - 1];
        let lower_band = mean - std * self.params.std_devs;
        let upper_band = mean + std * self.params.std_devs;

        if current < lower_band {
            return Some(SignalIntent {
                action: TradeAction::Buy,
                reason: format!(
                    "mean reversion: price {current:.2} below lower band {lower_band:.2}"
                ),
            });
        }

        if current > upper_band {
            return Some(SignalIntent {
                action: TradeAction::Sell,
                reason: format!(
                    "mean reversion: price {current:.2} above upper band {upper_band:.2}"
                ),
            });
        }

        None
    }
}
