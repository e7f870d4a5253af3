//! Engine configuration, run-state machine, and run output types.

use crate::domain::Portfolio;
use crate::execution::ExecutionConfig;
use thiserror::Error;

/// Default per-order quantity attached to every signal.
pub const DEFAULT_ORDER_QUANTITY: u32 = 10;

/// Configuration for a single simulation run.
///
/// Constructed explicitly and passed in — there is no process-wide engine
/// state, so two runs with different frictions can coexist.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Fixed quantity per order; signal generators do not size positions.
    pub order_quantity: u32,
    pub execution: ExecutionConfig,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            order_quantity: DEFAULT_ORDER_QUANTITY,
            execution: ExecutionConfig::default(),
        }
    }

    pub fn with_execution(initial_capital: f64, execution: ExecutionConfig) -> Self {
        Self {
            initial_capital,
            order_quantity: DEFAULT_ORDER_QUANTITY,
            execution,
        }
    }
}

/// Simulation lifecycle.
///
/// `Failed` is terminal and occurs only on an unrecoverable data error
/// (no bars at all); per-day gaps and trade rejections never fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Running,
    Completed,
    Failed,
}

/// Errors that abort a simulation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no historical bars available for any configured symbol")]
    NoData,

    #[error("simulation has already run")]
    AlreadyRun,
}

/// Result of a completed simulation: the frozen ledger plus run diagnostics.
///
/// The diagnostics are counters only — rejected signals are dropped without
/// a record, by design; the counts exist so callers can see that it happened.
#[derive(Debug)]
pub struct SimulationOutput {
    pub portfolio: Portfolio,
    /// Signals emitted by the generator across all symbols and days.
    pub signal_count: usize,
    /// Signals dropped by the funds/shares checks.
    pub rejected_trades: usize,
    /// Symbol-days skipped because history had not yet reached the
    /// generator's minimum window.
    pub insufficient_history_skips: usize,
}
