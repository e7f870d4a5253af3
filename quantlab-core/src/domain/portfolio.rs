//! Portfolio — the single-writer ledger: cash, positions, trade log, snapshots.

use super::position::Position;
use super::snapshot::DailySnapshot;
use super::trade::Trade;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate ledger state for a simulation run.
///
/// Mutated only by the simulation engine through the execution model.
/// Invariants: `cash >= 0` at all times; total value equals
/// `cash + sum(position.quantity * position.current_price)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    pub trades: Vec<Trade>,
    pub daily_values: Vec<DailySnapshot>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
            daily_values: Vec::new(),
        }
    }

    /// Sum of all position market values at their current marks.
    pub fn positions_value(&self) -> f64 {
        self.positions.values().map(Position::market_value).sum()
    }

    /// Total value = cash + sum of position market values.
    pub fn total_value(&self) -> f64 {
        self.cash + self.positions_value()
    }

    /// Quantity held in a symbol, zero if no open position.
    pub fn held_quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).map_or(0.0, |p| p.quantity)
    }

    /// Final portfolio value: the last daily snapshot, or initial capital
    /// if no day was ever simulated.
    pub fn final_value(&self) -> f64 {
        self.daily_values
            .last()
            .map_or(self.initial_capital, |s| s.value)
    }
}
