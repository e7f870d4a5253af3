//! Strategy signal generation — pure functions from a bar window to an
//! optional trade intent.
//!
//! Generators are portfolio-agnostic and stateless: they receive the bar
//! history up to the current day and nothing else, so the same window always
//! produces the same output. Position sizing is not a signal concern — the
//! engine attaches its configured per-order quantity to every intent.

pub mod indicators;
pub mod macd;
pub mod mean_reversion;
pub mod momentum;
pub mod rsi;
pub mod sma_crossover;

use crate::domain::{Bar, TradeAction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directional intent emitted by a signal generator.
///
/// Carries the side and a human-readable reason; the engine turns it into a
/// sized [`Signal`] against a concrete symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalIntent {
    pub action: TradeAction,
    pub reason: String,
}

/// A sized trade signal for one symbol on one simulated day.
///
/// Transient: produced fresh each day, routed to the execution model,
/// never persisted independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: u32,
    pub reason: String,
}

/// Trait for signal generators.
///
/// # Contract
/// `evaluate` receives the ordered bar history through the current day and
/// must return `None` (never panic) when the window is shorter than
/// `min_bars()`. Implementations must be deterministic and must not hold
/// mutable state across calls.
pub trait SignalGenerator: Send + Sync {
    /// Strategy name as it appears in configs (e.g., "sma_crossover").
    fn name(&self) -> &str;

    /// Minimum window length before this generator can produce output.
    fn min_bars(&self) -> usize;

    /// Evaluate the window ending at the current day.
    fn evaluate(&self, bars: &[Bar]) -> Option<SignalIntent>;
}

/// Null generator — never fires. Used as a stub in engine tests that
/// exercise the loop without real signal logic.
pub struct NullStrategy;

impl SignalGenerator for NullStrategy {
    fn name(&self) -> &str {
        "null"
    }

    fn min_bars(&self) -> usize {
        0
    }

    fn evaluate(&self, _bars: &[Bar]) -> Option<SignalIntent> {
        None
    }
}

/// Closed strategy configuration: one variant per supported generator, each
/// carrying its typed parameter struct.
///
/// Unknown strategy types are unrepresentable — a config string naming one
/// fails at deserialization, before any simulation starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum StrategyConfig {
    SmaCrossover(sma_crossover::SmaCrossoverParams),
    RsiOversold(rsi::RsiParams),
    Macd(macd::MacdParams),
    MeanReversion(mean_reversion::MeanReversionParams),
    Momentum(momentum::MomentumParams),
}

/// A deserializable but unusable parameter combination, such as a fast
/// period at or above the slow period.
#[derive(Debug, Error)]
#[error("invalid {strategy} parameters: {reason}")]
pub struct InvalidStrategyParams {
    pub strategy: &'static str,
    pub reason: &'static str,
}

impl StrategyConfig {
    /// Check the parameters without building a generator.
    ///
    /// Serde enforces the shape of a config but not the relationships
    /// between fields; callers handling untrusted input run this before
    /// [`generator`](Self::generator), which panics on bad parameters.
    pub fn validate(&self) -> Result<(), InvalidStrategyParams> {
        let result = match self {
            Self::SmaCrossover(params) => params.validate(),
            Self::RsiOversold(params) => params.validate(),
            Self::Macd(params) => params.validate(),
            Self::MeanReversion(params) => params.validate(),
            Self::Momentum(params) => params.validate(),
        };
        result.map_err(|reason| InvalidStrategyParams {
            strategy: self.name(),
            reason,
        })
    }

    /// Build the configured generator.
    ///
    /// Panics on parameters that fail [`validate`](Self::validate).
    pub fn generator(&self) -> Box<dyn SignalGenerator> {
        match self {
            Self::SmaCrossover(params) => Box::new(sma_crossover::SmaCrossover::new(params.clone())),
            Self::RsiOversold(params) => Box::new(rsi::RsiReversal::new(params.clone())),
            Self::Macd(params) => Box::new(macd::MacdCrossover::new(params.clone())),
            Self::MeanReversion(params) => {
                Box::new(mean_reversion::MeanReversion::new(params.clone()))
            }
            Self::Momentum(params) => Box::new(momentum::Momentum::new(params.clone())),
        }
    }

    /// Wire name of the strategy type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SmaCrossover(_) => "sma_crossover",
            Self::RsiOversold(_) => "rsi_oversold",
            Self::Macd(_) => "macd",
            Self::MeanReversion(_) => "mean_reversion",
            Self::Momentum(_) => "momentum",
        }
    }
}

// Re-export concrete generator types.
pub use macd::{MacdCrossover, MacdParams};
pub use mean_reversion::{MeanReversion, MeanReversionParams};
pub use momentum::{Momentum, MomentumParams};
pub use rsi::{RsiParams, RsiReversal};
pub use sma_crossover::{SmaCrossover, SmaCrossoverParams};
