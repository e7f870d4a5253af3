//! Backtest orchestration: request validation, run identity, data fetch,
//! engine wiring, and result assembly.

use std::collections::HashMap;

use chrono::NaiveDate;
use quantlab_core::data::BarSource;
use quantlab_core::domain::{Bar, Portfolio, RunId};
use quantlab_core::engine::{
    run_simulation, EngineConfig, EngineError, DEFAULT_ORDER_QUANTITY,
};
use quantlab_core::execution::ExecutionConfig;
use quantlab_core::strategy::{InvalidStrategyParams, StrategyConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::BacktestMetrics;

// ─── Request ─────────────────────────────────────────────────────────

/// A fully-specified backtest request, as deserialized at the API boundary.
///
/// Unknown strategy types are unrepresentable: `strategy` is a closed enum,
/// so a request naming one fails at deserialization before any work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub strategy: StrategyConfig,
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    /// Overrides the execution default when present.
    #[serde(default)]
    pub commission_rate: Option<f64>,
    #[serde(default)]
    pub slippage: Option<f64>,
    #[serde(default)]
    pub order_quantity: Option<u32>,
}

fn default_initial_capital() -> f64 {
    100_000.0
}

impl BacktestRequest {
    /// Fail fast on malformed parameters, including strategy parameter
    /// combinations serde cannot reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        if self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital {
                capital: self.initial_capital,
            });
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        if self.end < self.start {
            return Err(ConfigError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Deterministic run ID: BLAKE3 over the canonical JSON of the request.
    ///
    /// Identical requests always map to the same ID, so re-running a config
    /// overwrites rather than duplicates in any keyed store.
    pub fn run_id(&self) -> Result<RunId, serde_json::Error> {
        let canonical = serde_json::to_vec(self)?;
        Ok(RunId::from_fingerprint(&canonical))
    }

    fn engine_config(&self) -> EngineConfig {
        let defaults = ExecutionConfig::default();
        EngineConfig {
            initial_capital: self.initial_capital,
            order_quantity: self.order_quantity.unwrap_or(DEFAULT_ORDER_QUANTITY),
            execution: ExecutionConfig {
                slippage: self.slippage.unwrap_or(defaults.slippage),
                commission_rate: self.commission_rate.unwrap_or(defaults.commission_rate),
            },
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Request validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Strategy(#[from] InvalidStrategyParams),

    #[error("initial capital must be positive, got {capital}")]
    NonPositiveCapital { capital: f64 },

    #[error("at least one symbol is required")]
    NoSymbols,

    #[error("invalid date range: {start} to {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Errors that abort a backtest run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to fingerprint request: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

// ─── Result ──────────────────────────────────────────────────────────

/// Non-fatal observations collected along the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestDiagnostics {
    pub signal_count: usize,
    pub rejected_trades: usize,
    pub insufficient_history_skips: usize,
    /// Symbols whose data fetch failed; simulated as empty histories.
    pub failed_symbols: Vec<String>,
}

/// Completed backtest: identity, frozen ledger, metrics, diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub id: RunId,
    pub strategy: String,
    pub final_portfolio: Portfolio,
    pub metrics: BacktestMetrics,
    pub diagnostics: BacktestDiagnostics,
}

// ─── Orchestration ───────────────────────────────────────────────────

/// Run a backtest end to end: validate, fetch, simulate, measure.
///
/// Per-symbol fetch failures are tolerated — the symbol simulates as an
/// empty history and is reported in the diagnostics. The run fails with
/// [`EngineError::NoData`] only when every symbol comes back empty.
pub fn run_backtest(
    request: &BacktestRequest,
    source: &dyn BarSource,
) -> Result<BacktestResult, RunnerError> {
    request.validate()?;
    let id = request.run_id()?;

    let mut bars_by_symbol: HashMap<String, Vec<Bar>> = HashMap::new();
    let mut failed_symbols = Vec::new();
    for symbol in &request.symbols {
        match source.bars(symbol, request.start, request.end) {
            Ok(bars) => {
                bars_by_symbol.insert(symbol.clone(), bars);
            }
            Err(_) => {
                failed_symbols.push(symbol.clone());
                bars_by_symbol.insert(symbol.clone(), Vec::new());
            }
        }
    }

    let output = run_simulation(
        request.engine_config(),
        request.strategy.generator(),
        bars_by_symbol,
    )?;

    let metrics = BacktestMetrics::compute(&output.portfolio);
    Ok(BacktestResult {
        id,
        strategy: request.strategy.name().to_string(),
        metrics,
        diagnostics: BacktestDiagnostics {
            signal_count: output.signal_count,
            rejected_trades: output.rejected_trades,
            insufficient_history_skips: output.insufficient_history_skips,
            failed_symbols,
        },
        final_portfolio: output.portfolio,
    })
}
