//! Performance metrics — pure functions that compute backtest statistics.
//!
//! Every metric is a pure function over the frozen portfolio: snapshot
//! series and/or trade list in, scalar out. All ratios are fractions, not
//! percents. No dependencies on the runner or the engine.

use quantlab_core::domain::{Portfolio, Trade, TradeAction};
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_return: f64,
    pub final_value: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
    /// Average winning round trip in dollars.
    pub avg_win: f64,
    /// Average losing round trip in dollars, reported as a positive figure.
    pub avg_loss: f64,
}

impl BacktestMetrics {
    /// Compute all metrics from a completed portfolio.
    pub fn compute(portfolio: &Portfolio) -> Self {
        let values: Vec<f64> = portfolio.daily_values.iter().map(|s| s.value).collect();
        let final_value = portfolio.final_value();

        Self {
            total_return: total_return(portfolio.initial_capital, final_value),
            final_value,
            sharpe_ratio: sharpe_ratio(&values),
            max_drawdown: max_drawdown(&values, portfolio.initial_capital),
            win_rate: win_rate(&portfolio.trades),
            profit_factor: profit_factor(&portfolio.trades),
            total_trades: portfolio.trades.len(),
            avg_win: avg_win(&portfolio.trades),
            avg_loss: avg_loss(&portfolio.trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final − initial) / initial.
pub fn total_return(initial_capital: f64, final_value: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_value - initial_capital) / initial_capital
}

/// Annualized Sharpe ratio from the daily snapshot values.
///
/// Sharpe = mean(daily returns) / σ_population × √252, zero risk-free rate.
/// Returns 0.0 when variance is zero or fewer than 2 snapshots exist.
pub fn sharpe_ratio(values: &[f64]) -> f64 {
    let returns = daily_returns(values);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev_population(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * (252.0_f64).sqrt()
}

/// Maximum drawdown as a positive fraction (0.15 = a 15% peak-to-trough
/// decline). The peak is seeded with initial capital, so a portfolio that
/// only ever falls from its starting value still registers a drawdown.
pub fn max_drawdown(values: &[f64], initial_capital: f64) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Win rate: winning round trips over the number of sell trades.
///
/// A sell with no matching prior buy contributes to the denominator but can
/// never count as a win.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let sells = trades
        .iter()
        .filter(|t| t.action == TradeAction::Sell)
        .count();
    if sells == 0 {
        return 0.0;
    }
    let wins = trade_pnls(trades).iter().filter(|&&p| p > 0.0).count();
    wins as f64 / sells as f64
}

/// Profit factor: gross dollar profit over gross dollar loss across all
/// matched round trips.
///
/// Zero when there are no losses (undefined ratio collapses to 0, matching
/// the no-trades case).
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let pnls = trade_pnls(trades);
    let gross_profit: f64 = pnls.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = pnls.iter().filter(|&&p| p <= 0.0).map(|p| p.abs()).sum();
    if gross_loss < 1e-15 {
        return 0.0;
    }
    gross_profit / gross_loss
}

/// Mean winning round trip in dollars, 0.0 when no winners.
pub fn avg_win(trades: &[Trade]) -> f64 {
    let wins: Vec<f64> = trade_pnls(trades)
        .into_iter()
        .filter(|&p| p > 0.0)
        .collect();
    mean_f64(&wins)
}

/// Mean losing round trip in dollars, reported positive, 0.0 when every
/// sell wins.
///
/// The denominator is every non-winning sell, including sells with no
/// matching prior buy, so unmatched sells dilute the average.
pub fn avg_loss(trades: &[Trade]) -> f64 {
    let sells = trades
        .iter()
        .filter(|t| t.action == TradeAction::Sell)
        .count();
    let pnls = trade_pnls(trades);
    let wins = pnls.iter().filter(|&&p| p > 0.0).count();
    let losers = sells - wins;
    if losers == 0 {
        return 0.0;
    }
    let gross_loss: f64 = pnls.iter().filter(|&&p| p <= 0.0).map(|p| p.abs()).sum();
    gross_loss / losers as f64
}

/// Dollar P&L per matched round trip: `(sell_price − buy_price) ×
/// sell_quantity`, pairing each sell with the first buy of the same symbol
/// recorded strictly before it, in trade-log order. Sells with no prior buy
/// are skipped.
pub fn trade_pnls(trades: &[Trade]) -> Vec<f64> {
    trades
        .iter()
        .filter(|t| t.action == TradeAction::Sell)
        .filter_map(|sell| {
            let buy = first_prior_buy(trades, sell)?;
            Some((sell.price - buy.price) * sell.quantity)
        })
        .collect()
}

/// Fractional round-trip returns under the same pairing as [`trade_pnls`]:
/// `(sell_price − buy_price) / buy_price`. This list is the Monte Carlo
/// resampling input.
pub fn trade_returns(trades: &[Trade]) -> Vec<f64> {
    trades
        .iter()
        .filter(|t| t.action == TradeAction::Sell)
        .filter_map(|sell| {
            let buy = first_prior_buy(trades, sell)?;
            if buy.price <= 0.0 {
                return None;
            }
            Some((sell.price - buy.price) / buy.price)
        })
        .collect()
}

fn first_prior_buy<'a>(trades: &'a [Trade], sell: &Trade) -> Option<&'a Trade> {
    trades.iter().find(|b| {
        b.action == TradeAction::Buy && b.symbol == sell.symbol && b.date < sell.date
    })
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Daily returns over consecutive snapshot values.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev_population(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
