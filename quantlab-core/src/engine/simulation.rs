//! Day-by-day simulation loop — the heart of the backtesting engine.
//!
//! Each simulated day, in order:
//! 1. Look up every symbol's close for the date (symbols without a bar that
//!    day keep their previous mark).
//! 2. Revalue open positions, recompute total value, append a daily snapshot.
//! 3. Evaluate the signal generator for every symbol whose history has
//!    reached the generator's minimum window. Cross-symbol evaluation runs
//!    in parallel; generators are pure, so this cannot change results.
//! 4. Apply the resulting signals sequentially in symbol order against the
//!    single-writer ledger, through the execution model at the day's close.
//!
//! Determinism: identical bars and config produce an identical trade log and
//! snapshot series — there is no randomness anywhere on this path.

use crate::domain::{Bar, DailySnapshot, Portfolio};
use crate::execution::ExecutionModel;
use crate::strategy::{Signal, SignalGenerator, SignalIntent};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

use super::state::{EngineConfig, EngineError, RunState, SimulationOutput};

/// A single backtest simulation: owns the ledger for its lifetime.
///
/// State machine: `Initialized → Running → Completed`, or `Failed` when no
/// symbol has any bar. `run` may be called once.
pub struct Simulation {
    config: EngineConfig,
    generator: Box<dyn SignalGenerator>,
    bars_by_symbol: HashMap<String, Vec<Bar>>,
    state: RunState,
}

impl Simulation {
    /// Create a simulation over pre-fetched history.
    ///
    /// Bars are re-sorted ascending by date per symbol, defensively —
    /// providers are required to sort, but a misordered series must not
    /// corrupt the replay.
    pub fn new(
        config: EngineConfig,
        generator: Box<dyn SignalGenerator>,
        mut bars_by_symbol: HashMap<String, Vec<Bar>>,
    ) -> Self {
        for bars in bars_by_symbol.values_mut() {
            bars.sort_by_key(|b| b.date);
        }
        Self {
            config,
            generator,
            bars_by_symbol,
            state: RunState::Initialized,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the simulation to completion.
    pub fn run(&mut self) -> Result<SimulationOutput, EngineError> {
        if self.state != RunState::Initialized {
            return Err(EngineError::AlreadyRun);
        }

        let total_bars: usize = self.bars_by_symbol.values().map(Vec::len).sum();
        if total_bars == 0 {
            self.state = RunState::Failed;
            return Err(EngineError::NoData);
        }
        self.state = RunState::Running;

        // Symbol order fixes the trade application order for the whole run.
        let mut symbols: Vec<String> = self.bars_by_symbol.keys().cloned().collect();
        symbols.sort();

        // The day loop iterates the sorted union of all symbols' bar dates.
        let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();
        for bars in self.bars_by_symbol.values() {
            all_dates.extend(bars.iter().map(|b| b.date));
        }

        let mut cursors: Vec<usize> = vec![0; symbols.len()];
        let mut portfolio = Portfolio::new(self.config.initial_capital);
        let execution = ExecutionModel::new(self.config.execution.clone());
        let generator = self.generator.as_ref();
        let min_bars = generator.min_bars();

        let mut signal_count = 0usize;
        let mut rejected_trades = 0usize;
        let mut insufficient_history_skips = 0usize;

        for &date in &all_dates {
            // Advance each symbol's cursor so bars[..cursor] is the history
            // through `date`, and collect the day's closes.
            let mut prices: HashMap<&str, f64> = HashMap::new();
            for (i, symbol) in symbols.iter().enumerate() {
                let bars = &self.bars_by_symbol[symbol];
                while cursors[i] < bars.len() && bars[cursors[i]].date <= date {
                    cursors[i] += 1;
                }
                let end = cursors[i];
                if end > 0 && bars[end - 1].date == date {
                    prices.insert(symbol.as_str(), bars[end - 1].close);
                }
            }

            // Mark-to-market and snapshot.
            for (symbol, position) in portfolio.positions.iter_mut() {
                if let Some(&price) = prices.get(symbol.as_str()) {
                    position.current_price = price;
                }
            }
            let positions_value = portfolio.positions_value();
            let value = portfolio.cash + positions_value;
            portfolio.daily_values.push(DailySnapshot {
                date,
                value,
                cash: portfolio.cash,
                positions_value,
            });

            // Eligible evaluation windows for the day.
            let mut windows: Vec<(usize, usize)> = Vec::with_capacity(symbols.len());
            for (i, _) in symbols.iter().enumerate() {
                let end = cursors[i];
                if end == 0 {
                    continue;
                }
                if end < min_bars {
                    insufficient_history_skips += 1;
                    continue;
                }
                windows.push((i, end));
            }

            // Cross-symbol evaluation in parallel. `collect` preserves input
            // order, so the sequential application below always sees signals
            // in symbol order regardless of scheduling.
            let intents: Vec<(usize, SignalIntent)> = windows
                .par_iter()
                .filter_map(|&(i, end)| {
                    let bars = &self.bars_by_symbol[&symbols[i]];
                    generator.evaluate(&bars[..end]).map(|intent| (i, intent))
                })
                .collect();

            // Serialized trade application against the shared ledger.
            for (i, intent) in intents {
                signal_count += 1;
                let symbol = &symbols[i];
                // A signal for a symbol with no bar today has no execution
                // price; it is skipped, not rejected.
                let Some(&price) = prices.get(symbol.as_str()) else {
                    continue;
                };
                let signal = Signal {
                    symbol: symbol.clone(),
                    action: intent.action,
                    quantity: self.config.order_quantity,
                    reason: intent.reason,
                };
                match execution.execute(&mut portfolio, &signal, price, date) {
                    Some(_) => {
                        debug_assert!(
                            portfolio.cash >= 0.0,
                            "cash went negative after trade: {}",
                            portfolio.cash
                        );
                    }
                    None => rejected_trades += 1,
                }
            }
        }

        self.state = RunState::Completed;
        Ok(SimulationOutput {
            portfolio,
            signal_count,
            rejected_trades,
            insufficient_history_skips,
        })
    }
}

/// Convenience entry point: build and run a simulation in one call.
pub fn run_simulation(
    config: EngineConfig,
    generator: Box<dyn SignalGenerator>,
    bars_by_symbol: HashMap<String, Vec<Bar>>,
) -> Result<SimulationOutput, EngineError> {
    Simulation::new(config, generator, bars_by_symbol).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::bars_from_closes;
    use crate::domain::TradeAction;
    use crate::execution::ExecutionConfig;
    use crate::strategy::{MomentumParams, NullStrategy, StrategyConfig};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn single_symbol(closes: &[f64]) -> HashMap<String, Vec<Bar>> {
        let mut map = HashMap::new();
        map.insert("SPY".to_string(), bars_from_closes("SPY", start(), closes));
        map
    }

    #[test]
    fn no_data_fails_the_run() {
        let mut map = HashMap::new();
        map.insert("SPY".to_string(), Vec::new());
        let mut sim = Simulation::new(EngineConfig::new(10_000.0), Box::new(NullStrategy), map);

        let err = sim.run().unwrap_err();
        assert!(matches!(err, EngineError::NoData));
        assert_eq!(sim.state(), RunState::Failed);
    }

    #[test]
    fn run_is_single_shot() {
        let mut sim = Simulation::new(
            EngineConfig::new(10_000.0),
            Box::new(NullStrategy),
            single_symbol(&[100.0, 101.0, 102.0]),
        );
        sim.run().unwrap();
        assert_eq!(sim.state(), RunState::Completed);
        assert!(matches!(sim.run().unwrap_err(), EngineError::AlreadyRun));
    }

    #[test]
    fn one_snapshot_per_day_in_date_order() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0];
        let output = run_simulation(
            EngineConfig::new(10_000.0),
            Box::new(NullStrategy),
            single_symbol(&closes),
        )
        .unwrap();

        let snaps = &output.portfolio.daily_values;
        assert_eq!(snaps.len(), closes.len());
        for window in snaps.windows(2) {
            assert!(window[0].date < window[1].date);
        }
        // Null strategy: no trades, value stays at initial capital.
        assert!(snaps.iter().all(|s| s.value == 10_000.0));
        assert!(output.portfolio.trades.is_empty());
    }

    #[test]
    fn day_loop_covers_union_of_dates() {
        // SPY trades days 0..=2, QQQ days 2..=4: five distinct dates.
        let mut map = HashMap::new();
        map.insert(
            "SPY".to_string(),
            bars_from_closes("SPY", start(), &[100.0, 101.0, 102.0]),
        );
        map.insert(
            "QQQ".to_string(),
            bars_from_closes(
                "QQQ",
                start() + chrono::Duration::days(2),
                &[200.0, 201.0, 202.0],
            ),
        );

        let output =
            run_simulation(EngineConfig::new(10_000.0), Box::new(NullStrategy), map).unwrap();
        assert_eq!(output.portfolio.daily_values.len(), 5);
    }

    #[test]
    fn misordered_bars_are_resorted() {
        let mut bars = bars_from_closes("SPY", start(), &[100.0, 101.0, 102.0]);
        bars.reverse();
        let mut map = HashMap::new();
        map.insert("SPY".to_string(), bars);

        let output =
            run_simulation(EngineConfig::new(10_000.0), Box::new(NullStrategy), map).unwrap();
        let snaps = &output.portfolio.daily_values;
        assert_eq!(snaps[0].date, start());
        assert!(snaps.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn momentum_strategy_trades_and_counts_skips() {
        // Flat for 19 bars, then a 10% jump: one buy on the jump day.
        let mut closes = vec![100.0; 19];
        closes.push(110.0);
        let config = StrategyConfig::Momentum(MomentumParams {
            lookback: 20,
            threshold: 0.05,
        });

        let output = run_simulation(
            EngineConfig::with_execution(10_000.0, ExecutionConfig::frictionless()),
            config.generator(),
            single_symbol(&closes),
        )
        .unwrap();

        assert_eq!(output.signal_count, 1);
        assert_eq!(output.portfolio.trades.len(), 1);
        let trade = &output.portfolio.trades[0];
        assert_eq!(trade.action, TradeAction::Buy);
        assert_eq!(trade.quantity, 10.0);
        assert_eq!(trade.price, 110.0);
        // Days 1..19 had history but less than the 20-bar minimum.
        assert_eq!(output.insufficient_history_skips, 19);
        // Cash reflects the fill; the day's snapshot was taken before it.
        assert!((output.portfolio.cash - (10_000.0 - 1_100.0)).abs() < 1e-9);
    }

    #[test]
    fn rejected_sell_is_counted_but_not_recorded() {
        // A crash triggers a momentum sell with no open position.
        let mut closes = vec![100.0; 19];
        closes.push(80.0);
        let config = StrategyConfig::Momentum(MomentumParams {
            lookback: 20,
            threshold: 0.05,
        });

        let output = run_simulation(
            EngineConfig::new(10_000.0),
            config.generator(),
            single_symbol(&closes),
        )
        .unwrap();

        assert_eq!(output.signal_count, 1);
        assert_eq!(output.rejected_trades, 1);
        assert!(output.portfolio.trades.is_empty());
        assert_eq!(output.portfolio.cash, 10_000.0);
    }

    #[test]
    fn snapshot_identity_holds_every_day() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0).collect();
        let config = StrategyConfig::Momentum(MomentumParams {
            lookback: 5,
            threshold: 0.01,
        });

        let output = run_simulation(
            EngineConfig::new(10_000.0),
            config.generator(),
            single_symbol(&closes),
        )
        .unwrap();

        for snap in &output.portfolio.daily_values {
            assert!(
                (snap.value - (snap.cash + snap.positions_value)).abs() < 1e-9,
                "identity violated on {}",
                snap.date
            );
        }
    }
}
