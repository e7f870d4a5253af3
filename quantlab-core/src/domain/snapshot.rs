//! DailySnapshot — end-of-revaluation portfolio value for one simulated day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One snapshot per simulated day, recorded in date order.
///
/// The `value` series is the return series used for Sharpe ratio and
/// drawdown. Invariant: `value == cash + positions_value` at record time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub value: f64,
    pub cash: f64,
    pub positions_value: f64,
}
