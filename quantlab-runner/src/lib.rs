//! QuantLab Runner — backtest orchestration on top of `quantlab-core`.
//!
//! This crate turns a validated request into a finished result:
//! - Request validation and deterministic run identity
//! - Data fetch through the core `BarSource` trait
//! - Performance metrics over the frozen portfolio
//! - Monte Carlo resampling of realized trade returns
//! - A persistence-sink interface for result storage

pub mod metrics;
pub mod monte_carlo;
pub mod runner;
pub mod sink;

pub use metrics::BacktestMetrics;
pub use monte_carlo::{
    run_monte_carlo, MonteCarloConfig, MonteCarloError, MonteCarloResult, MonteCarloStats,
};
pub use runner::{
    run_backtest, BacktestDiagnostics, BacktestRequest, BacktestResult, ConfigError,
    RunnerError,
};
pub use sink::{MemorySink, PersistenceSink, SinkError};
