//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Cash never goes negative, whatever the price path
//! 2. Replay determinism — same bars and config, same trade log
//! 3. Trade arithmetic — totals are consistent with price and commission
//! 4. Snapshot accounting — value = cash + positions_value on every day

use proptest::prelude::*;
use std::collections::HashMap;

use chrono::NaiveDate;
use quantlab_core::data::synthetic::bars_from_closes;
use quantlab_core::domain::{Bar, TradeAction};
use quantlab_core::engine::{run_simulation, EngineConfig, SimulationOutput};
use quantlab_core::strategy::{MeanReversionParams, MomentumParams, StrategyConfig};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random walk of daily closes, bounded away from zero.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    (prop::collection::vec(-0.05..0.05_f64, 30..120), 20.0..200.0_f64).prop_map(
        |(steps, base)| {
            let mut price = base;
            let mut closes = Vec::with_capacity(steps.len());
            for step in steps {
                price = (price * (1.0 + step)).max(1.0);
                closes.push((price * 100.0).round() / 100.0);
            }
            closes
        },
    )
}

fn arb_capital() -> impl Strategy<Value = f64> {
    (1_000.0..100_000.0_f64).prop_map(|c| c.round())
}

fn run_mean_reversion(closes: &[f64], capital: f64) -> SimulationOutput {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut map: HashMap<String, Vec<Bar>> = HashMap::new();
    map.insert("SPY".to_string(), bars_from_closes("SPY", start, closes));
    let config = StrategyConfig::MeanReversion(MeanReversionParams {
        period: 10,
        std_devs: 1.0,
    });
    run_simulation(EngineConfig::new(capital), config.generator(), map).unwrap()
}

// ── 1. Cash non-negativity ───────────────────────────────────────────

proptest! {
    /// Rejection checks keep cash at or above zero on every snapshot,
    /// for any price path and any starting capital.
    #[test]
    fn cash_never_negative(closes in arb_closes(), capital in arb_capital()) {
        let output = run_mean_reversion(&closes, capital);
        for snap in &output.portfolio.daily_values {
            prop_assert!(snap.cash >= 0.0, "cash {} on {}", snap.cash, snap.date);
        }
        prop_assert!(output.portfolio.cash >= 0.0);
    }
}

// ── 2. Determinism ───────────────────────────────────────────────────

proptest! {
    /// Two runs over the same bars produce byte-for-byte identical trade
    /// logs and snapshot series.
    #[test]
    fn replay_is_deterministic(closes in arb_closes()) {
        let a = run_mean_reversion(&closes, 50_000.0);
        let b = run_mean_reversion(&closes, 50_000.0);

        prop_assert_eq!(a.portfolio.trades.len(), b.portfolio.trades.len());
        for (x, y) in a.portfolio.trades.iter().zip(&b.portfolio.trades) {
            prop_assert_eq!(x.date, y.date);
            prop_assert_eq!(x.action, y.action);
            prop_assert_eq!(x.price, y.price);
            prop_assert_eq!(x.total, y.total);
        }
        for (x, y) in a
            .portfolio
            .daily_values
            .iter()
            .zip(&b.portfolio.daily_values)
        {
            prop_assert_eq!(x.value, y.value);
        }
        prop_assert_eq!(a.signal_count, b.signal_count);
        prop_assert_eq!(a.rejected_trades, b.rejected_trades);
    }
}

// ── 3. Trade arithmetic ──────────────────────────────────────────────

proptest! {
    /// Buy totals equal notional plus commission; sell totals equal
    /// notional minus commission.
    #[test]
    fn trade_totals_are_consistent(closes in arb_closes(), capital in arb_capital()) {
        let output = run_mean_reversion(&closes, capital);
        for trade in &output.portfolio.trades {
            let notional = trade.quantity * trade.price;
            let expected = match trade.action {
                TradeAction::Buy => notional + trade.commission,
                TradeAction::Sell => notional - trade.commission,
            };
            prop_assert!(
                (trade.total - expected).abs() < 1e-9,
                "inconsistent total on {}: {} vs {}",
                trade.date,
                trade.total,
                expected
            );
            prop_assert!(trade.commission >= 0.0);
            prop_assert!(trade.price > 0.0);
        }
    }
}

// ── 4. Snapshot accounting ───────────────────────────────────────────

proptest! {
    /// value = cash + positions_value on every snapshot, with momentum
    /// exercising entries and exits.
    #[test]
    fn snapshot_identity_holds(closes in arb_closes()) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut map: HashMap<String, Vec<Bar>> = HashMap::new();
        map.insert("SPY".to_string(), bars_from_closes("SPY", start, &closes));
        let config = StrategyConfig::Momentum(MomentumParams {
            lookback: 5,
            threshold: 0.02,
        });
        let output =
            run_simulation(EngineConfig::new(50_000.0), config.generator(), map).unwrap();

        prop_assert_eq!(output.portfolio.daily_values.len(), closes.len());
        for snap in &output.portfolio.daily_values {
            prop_assert!(
                (snap.value - (snap.cash + snap.positions_value)).abs() < 1e-9,
                "identity violated on {}",
                snap.date
            );
        }
    }
}
