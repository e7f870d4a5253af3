//! Trade — an append-only log entry for an executed fill.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of a trade or signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// A single executed trade. Immutable once appended to the portfolio's log.
///
/// `price` is the execution price after slippage. `total` is the cash impact:
/// cost + commission for buys, proceeds − commission for sells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: f64,
    pub price: f64,
    pub commission: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = Trade {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            symbol: "SPY".into(),
            action: TradeAction::Buy,
            quantity: 10.0,
            price: 50.05,
            commission: 0.5005,
            total: 501.0005,
        };
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"buy\""));
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.action, TradeAction::Buy);
        assert_eq!(deser.total, trade.total);
    }
}
