//! Physical plant model for the Matflow simulation.
//!
//! This crate models the hardware of a modular production plant: slots
//! (actuators, sensors, buffer states) guarded by typed dimensions, the
//! transfer-function family that advances them, and the component /
//! module containers that group them.
//!
//! # Modules
//!
//! - [`slot`] -- Bounded scalar slots with the write/deactivate contract
//!   and the value/status taps read by the signal graph.
//! - [`transfer`] -- The built-in transfer-function family (belts,
//!   pumps, silos, sensors) with data-driven construction.
//! - [`component`] -- Named, ordered slot containers.
//! - [`module`] -- Component groups with flattened slot views, and the
//!   [`Element`] plant-assembly unit.
//!
//! [`Element`]: module::Element

pub mod component;
pub mod module;
pub mod slot;
pub mod transfer;

// Re-export primary types at crate root.
pub use component::Component;
pub use module::{Element, Module};
pub use slot::{Slot, SlotKind, Tap};
pub use transfer::{TransferError, TransferFunction};
