//! Deterministic run identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic run ID: a BLAKE3 hash of the backtest request fingerprint.
///
/// Identical requests hash to identical IDs across builds and platforms,
/// which keeps result identity reproducible without process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Hash an already-canonicalized fingerprint.
    pub fn from_fingerprint(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
