//! Simulation engine — day-by-day replay loop and supporting types.

pub mod simulation;
pub mod state;

pub use simulation::{run_simulation, Simulation};
pub use state::{
    EngineConfig, EngineError, RunState, SimulationOutput, DEFAULT_ORDER_QUANTITY,
};
