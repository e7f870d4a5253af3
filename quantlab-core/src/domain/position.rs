//! Position — an open holding in a single symbol.

use serde::{Deserialize, Serialize};

/// An open long position.
///
/// `average_cost` is the volume-weighted cost basis of all open buy lots
/// (commission excluded from the basis). `current_price` is the most recent
/// mark; the engine updates it against each day's close. A position is
/// removed from the portfolio when its quantity reaches exactly zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub average_cost: f64,
    pub current_price: f64,
}

impl Position {
    /// Create an empty position, marked at the given price.
    pub fn new(symbol: String, current_price: f64) -> Self {
        Self {
            symbol,
            quantity: 0.0,
            average_cost: 0.0,
            current_price,
        }
    }

    /// Market value at the current mark.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.current_price
    }

    /// Unrealized profit relative to the cost basis.
    pub fn unrealized_pnl(&self) -> f64 {
        self.quantity * (self.current_price - self.average_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_value_and_pnl() {
        let pos = Position {
            symbol: "SPY".into(),
            quantity: 10.0,
            average_cost: 100.0,
            current_price: 110.0,
        };
        assert_eq!(pos.market_value(), 1100.0);
        assert_eq!(pos.unrealized_pnl(), 100.0);
    }

    #[test]
    fn new_position_is_empty() {
        let pos = Position::new("SPY".into(), 50.0);
        assert_eq!(pos.quantity, 0.0);
        assert_eq!(pos.average_cost, 0.0);
        assert_eq!(pos.market_value(), 0.0);
    }
}
