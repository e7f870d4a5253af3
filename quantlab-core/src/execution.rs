//! Trade execution model — converts signals into fills against the ledger.
//!
//! Applies fixed fractional slippage to the market price and charges
//! commission on the slipped notional, on both sides. Signals that fail the
//! funds or shares check are dropped silently: no trade record, no error.
//! The engine counts such rejections in its run diagnostics.

use crate::domain::{Portfolio, Position, Trade, TradeAction};
use crate::strategy::Signal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Frictional cost parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Fractional slippage applied against the trader (default 0.05%).
    pub slippage: f64,
    /// Commission as a fraction of slipped notional (default 0.1%).
    pub commission_rate: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            slippage: 0.0005,
            commission_rate: 0.001,
        }
    }
}

impl ExecutionConfig {
    /// Zero-cost execution, for tests that want clean arithmetic.
    pub fn frictionless() -> Self {
        Self {
            slippage: 0.0,
            commission_rate: 0.0,
        }
    }
}

/// Executes signals against a portfolio ledger.
#[derive(Debug, Clone)]
pub struct ExecutionModel {
    config: ExecutionConfig,
}

impl ExecutionModel {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Execute a signal at the day's market price.
    ///
    /// Returns the recorded [`Trade`] on success, `None` when the signal is
    /// rejected (insufficient cash for a buy, insufficient shares for a
    /// sell). Exactly one trade is appended to the ledger per accepted
    /// signal; rejections leave the ledger untouched.
    pub fn execute(
        &self,
        portfolio: &mut Portfolio,
        signal: &Signal,
        market_price: f64,
        date: NaiveDate,
    ) -> Option<Trade> {
        let quantity = f64::from(signal.quantity);

        match signal.action {
            TradeAction::Buy => {
                let price = market_price * (1.0 + self.config.slippage);
                let cost = quantity * price;
                let commission = cost * self.config.commission_rate;
                let total = cost + commission;

                if portfolio.cash < total {
                    return None;
                }
                portfolio.cash -= total;

                let position = portfolio
                    .positions
                    .entry(signal.symbol.clone())
                    .or_insert_with(|| Position::new(signal.symbol.clone(), price));
                // Volume-weighted basis over old and new lots; commission
                // stays out of the basis.
                position.average_cost = (position.average_cost * position.quantity + cost)
                    / (position.quantity + quantity);
                position.quantity += quantity;

                let trade = Trade {
                    date,
                    symbol: signal.symbol.clone(),
                    action: TradeAction::Buy,
                    quantity,
                    price,
                    commission,
                    total,
                };
                portfolio.trades.push(trade.clone());
                Some(trade)
            }
            TradeAction::Sell => {
                if portfolio.held_quantity(&signal.symbol) < quantity {
                    return None;
                }

                let price = market_price * (1.0 - self.config.slippage);
                let proceeds = quantity * price;
                let commission = proceeds * self.config.commission_rate;
                let total = proceeds - commission;

                portfolio.cash += total;

                let remaining = {
                    let position = portfolio
                        .positions
                        .get_mut(&signal.symbol)
                        .expect("held_quantity confirmed the position exists");
                    position.quantity -= quantity;
                    position.quantity
                };
                if remaining == 0.0 {
                    portfolio.positions.remove(&signal.symbol);
                }

                let trade = Trade {
                    date,
                    symbol: signal.symbol.clone(),
                    action: TradeAction::Sell,
                    quantity,
                    price,
                    commission,
                    total,
                };
                portfolio.trades.push(trade.clone());
                Some(trade)
            }
        }
    }
}
