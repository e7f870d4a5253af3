//! Persistence sink — the storage collaborator, as an interface.
//!
//! The runner never talks to a database; completed results are handed to a
//! [`PersistenceSink`]. Real implementations live outside this workspace.
//! [`MemorySink`] is the standard test double.

use std::sync::Mutex;

use thiserror::Error;

use crate::runner::BacktestResult;

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Write(String),
}

/// Trait for result storage backends.
pub trait PersistenceSink: Send + Sync {
    /// Human-readable name of this sink.
    fn name(&self) -> &str;

    /// Persist a completed result. Keyed by `result.id`, so saving the same
    /// run twice overwrites rather than duplicates.
    fn save(&self, result: &BacktestResult) -> Result<(), SinkError>;
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<BacktestResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_count(&self) -> usize {
        self.saved.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Snapshot of everything saved so far.
    pub fn saved(&self) -> Vec<BacktestResult> {
        self.saved.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl PersistenceSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn save(&self, result: &BacktestResult) -> Result<(), SinkError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| SinkError::Write("memory sink lock poisoned".to_string()))?;
        saved.retain(|r| r.id != result.id);
        saved.push(result.clone());
        Ok(())
    }
}
