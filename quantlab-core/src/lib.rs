//! QuantLab Core — domain types, strategy signals, execution, and the
//! day-by-day simulation loop.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, positions, trades, snapshots, the portfolio ledger)
//! - Five pluggable signal generators behind the `SignalGenerator` trait
//! - A frictional execution model (slippage plus proportional commission)
//! - The day-by-day replay loop with parallel cross-symbol evaluation
//! - The `BarSource` interface for historical data providers

pub mod data;
pub mod domain;
pub mod engine;
pub mod execution;
pub mod strategy;
