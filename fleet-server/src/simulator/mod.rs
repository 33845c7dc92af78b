//! Simulated live tracking along a fetched path.

mod runner;
mod state;

pub use runner::{SimulationConfig, Tracker, TrackingHandle, spawn_tracking};
pub use state::{SimulationError, SimulationSnapshot, SimulationStatus, TransitSimulator};
