//! Historical bar source — the external data collaborator, as an interface.
//!
//! The engine never performs I/O itself: all price history is fetched up
//! front through the [`BarSource`] trait. Implementations live outside this
//! workspace (API layer, database, vendor adapters); an in-memory source and
//! a deterministic synthetic series are provided for tests and benches.

pub mod synthetic;

use crate::domain::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Structured error types for historical data fetches.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid date range: {start} to {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for historical data providers.
///
/// Returned bars should be sorted ascending by date; the engine re-sorts
/// defensively before simulating, so a misbehaving provider degrades
/// gracefully rather than corrupting the replay order.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Bar>, DataError>;
}

/// In-memory bar source backed by a symbol map. The standard test and demo
/// provider.
#[derive(Debug, Default)]
pub struct InMemoryBarSource {
    series: HashMap<String, Vec<Bar>>,
}

impl InMemoryBarSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol's full bar history.
    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.series.insert(symbol.into(), bars);
    }
}

impl BarSource for InMemoryBarSource {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        if end < start {
            return Err(DataError::InvalidRange { start, end });
        }
        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(series
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect())
    }
}
