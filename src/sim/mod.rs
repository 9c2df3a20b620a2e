//! Simulated fishing engine
//!
//! Stands in for the game so the automation core can run, and be tested,
//! without a live engine.

pub mod driver;
pub mod engine;

pub use driver::{FishingDriver, RoundOutcome, RoundReport, SimulationReport};
pub use engine::{ReelFault, SimulatedEngine};
