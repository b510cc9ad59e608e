//! Simulation core for Matflow plants: signal graph and tick driver.
//!
//! This crate owns the machinery that turns a pile of components into a
//! running plant: the flat slot registry built at setup, the ordered
//! signal graph, the per-tick driver, and the clock.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and simulated-time accumulator with
//!   checked arithmetic.
//! - [`config`] -- Configuration loading from YAML into strongly-typed
//!   structs with per-field defaults.
//! - [`graph`] -- The ordered edge list evaluated each tick, with the
//!   value/status provider taps.
//! - [`registry`] -- Flat slot addressing and the shared name space
//!   (duplicate names auto-suffixed at setup).
//! - [`plant`] -- The top-level container: element assembly, setup,
//!   signal registration, reset, accounting marks.
//! - [`tick`] -- The per-tick driver: actuator writes, in-order graph
//!   evaluation with write-through, aggregate accounting.

pub mod clock;
pub mod config;
pub mod graph;
pub mod plant;
pub mod registry;
pub mod tick;

// Re-export primary types at crate root.
pub use clock::{ClockError, SimClock};
pub use config::{
    ConfigError, MarginConfig, PlantSettings, ProductionConfig, RewardConfig, SimulationConfig,
    TerminalActuatorPolicy,
};
pub use graph::{Provider, SignalEdge, SignalGraph, SlotKey};
pub use plant::{Plant, SetupError};
pub use registry::SlotRegistry;
pub use tick::{TickError, TickSummary, run_tick};
