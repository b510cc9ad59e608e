//! Shared type definitions for the Matflow plant simulation.
//!
//! This crate is the single source of truth for the types exchanged
//! between the plant model, the simulation core, and the agent adaptor.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`dimension`] -- Typed, bounded scalar dimensions with unit metadata
//! - [`action`] -- Agent action vectors and per-agent submissions
//! - [`observation`] -- Normalized observations and telemetry rows
//! - [`reward`] -- Reward flavors for multi-agent control

pub mod action;
pub mod dimension;
pub mod ids;
pub mod observation;
pub mod reward;

// Re-export all public types at crate root for convenience.
pub use action::{ActionInput, ActionRequest};
pub use dimension::{BaseSet, Dimension, DimensionError};
pub use ids::{AgentId, ComponentId, ModuleId, PlantId, SlotId};
pub use observation::{Observation, TelemetryRecord};
pub use reward::{Reward, RewardMode};
