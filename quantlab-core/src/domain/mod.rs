//! Domain types: bars, positions, portfolio ledger, trades, snapshots, IDs.

pub mod bar;
pub mod ids;
pub mod portfolio;
pub mod position;
pub mod snapshot;
pub mod trade;

pub use bar::Bar;
pub use ids::RunId;
pub use portfolio::Portfolio;
pub use position::Position;
pub use snapshot::DailySnapshot;
pub use trade::{Trade, TradeAction};
