//! Monte Carlo resampling of realized trade returns.
//!
//! Each simulated path draws the same number of returns as the source list,
//! with replacement, and compounds them from the starting capital. Paths are
//! independent, so they run in parallel; per-path RNGs are seeded by BLAKE3
//! sub-seeds of `(master seed, path index)`, so results are identical
//! regardless of thread count or scheduling order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for the resampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Number of resampled paths (default 1000).
    pub num_simulations: usize,
    /// Master RNG seed for reproducibility.
    pub seed: u64,
    /// Full equity paths retained in the result for plotting; terminal
    /// values of all paths still feed the statistics.
    pub max_paths_retained: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            seed: 42,
            max_paths_retained: 100,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// One retained resampled path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloPath {
    pub index: usize,
    pub final_value: f64,
    /// Equity after each compounded draw, starting at initial capital.
    pub path: Vec<f64>,
}

/// Distribution statistics over all terminal values.
///
/// Percentiles use the rank convention `sorted[⌊n·q⌋]`, not interpolation,
/// so small runs land exactly on sample values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloStats {
    pub mean: f64,
    pub median: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
    pub min: f64,
    pub max: f64,
}

/// Full resampling result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub num_simulations: usize,
    /// First `max_paths_retained` paths, in index order.
    pub paths: Vec<MonteCarloPath>,
    pub stats: MonteCarloStats,
}

/// Errors from the resampler.
#[derive(Debug, Error)]
pub enum MonteCarloError {
    #[error("no trade returns available to resample")]
    InsufficientData,
}

// ─── Resampler ───────────────────────────────────────────────────────

/// Resample realized trade returns into a terminal-value distribution.
pub fn run_monte_carlo(
    returns: &[f64],
    initial_capital: f64,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, MonteCarloError> {
    if returns.is_empty() {
        return Err(MonteCarloError::InsufficientData);
    }

    let outcomes: Vec<(f64, Option<Vec<f64>>)> = (0..config.num_simulations)
        .into_par_iter()
        .map(|index| {
            let mut rng = path_rng(config.seed, index as u64);
            let mut value = initial_capital;
            let retain = index < config.max_paths_retained;
            let mut path = retain.then(|| {
                let mut p = Vec::with_capacity(returns.len() + 1);
                p.push(value);
                p
            });

            for _ in 0..returns.len() {
                let draw = returns[rng.gen_range(0..returns.len())];
                value *= 1.0 + draw;
                if let Some(p) = path.as_mut() {
                    p.push(value);
                }
            }
            (value, path)
        })
        .collect();

    let mut finals: Vec<f64> = outcomes.iter().map(|(v, _)| *v).collect();
    finals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let paths = outcomes
        .into_iter()
        .enumerate()
        .filter_map(|(index, (final_value, path))| {
            path.map(|path| MonteCarloPath {
                index,
                final_value,
                path,
            })
        })
        .collect();

    Ok(MonteCarloResult {
        num_simulations: config.num_simulations,
        paths,
        stats: stats_from_sorted(&finals),
    })
}

/// Per-path RNG from a BLAKE3 sub-seed of (master seed, path index).
fn path_rng(master_seed: u64, index: u64) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(&index.to_le_bytes());
    let hash = hasher.finalize();
    let seed = u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap());
    StdRng::seed_from_u64(seed)
}

fn stats_from_sorted(sorted: &[f64]) -> MonteCarloStats {
    let n = sorted.len();
    if n == 0 {
        return MonteCarloStats {
            mean: 0.0,
            median: 0.0,
            percentile_5: 0.0,
            percentile_95: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }
    let rank = |q: f64| sorted[(((n as f64) * q) as usize).min(n - 1)];
    MonteCarloStats {
        mean: sorted.iter().sum::<f64>() / n as f64,
        median: rank(0.5),
        percentile_5: rank(0.05),
        percentile_95: rank(0.95),
        min: sorted[0],
        max: sorted[n - 1],
    }
}
