//! Bounded scalar slots: actuators, sensors, and buffer states.
//!
//! A [`Slot`] is one mutable scalar of plant state, guarded by its
//! [`Dimension`]. The three kinds share the same storage and write
//! contract and differ only in who writes them:
//!
//! - **Actuators** are written by the tick driver at tick start from the
//!   agent action vector. They carry no transfer function.
//! - **Sensors** are written by their bound transfer function during
//!   graph evaluation; typically boolean threshold outputs.
//! - **Buffer states** are written by their bound transfer function and
//!   carry physical quantities (litres, energy, transported material).
//!
//! A failed write (out of range, wrong type) deactivates the slot and
//! clears its value; it never raises. Downstream transfer functions
//! observe the deactivated slot as `0.0` and contribute nothing.

use matflow_types::{Dimension, SlotId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::transfer::TransferFunction;

/// The three slot roles of the plant model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Written by the tick driver from the agent action vector.
    Actuator,
    /// Written by a bound transfer function; typically boolean.
    Sensor,
    /// Written by a bound transfer function; physical quantity.
    BufferState,
}

/// How the signal graph reads a slot: its value or its activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tap {
    /// Read the current value; an unset value reads as `0.0`.
    Value,
    /// Read the activation status as `0.0` / `1.0`.
    Status,
}

/// A typed, bounded scalar slot with activation status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable identifier, assigned at construction.
    id: SlotId,
    /// The dimension guarding every write.
    dimension: Dimension,
    /// The slot's role.
    kind: SlotKind,
    /// The transfer function bound at construction. `None` for
    /// actuators; exactly one for sensors and buffer states.
    transfer: Option<TransferFunction>,
    /// Current value; `None` until the first successful write and after
    /// any failed write.
    value: Option<f64>,
    /// Whether the most recent write succeeded.
    active: bool,
}

impl Slot {
    /// Create an actuator slot. Starts deactivated with no value.
    pub fn actuator(dimension: Dimension) -> Self {
        Self {
            id: SlotId::new(),
            dimension,
            kind: SlotKind::Actuator,
            transfer: None,
            value: None,
            active: false,
        }
    }

    /// Create a sensor slot bound to its transfer function.
    pub fn sensor(dimension: Dimension, transfer: TransferFunction) -> Self {
        Self {
            id: SlotId::new(),
            dimension,
            kind: SlotKind::Sensor,
            transfer: Some(transfer),
            value: None,
            active: false,
        }
    }

    /// Create a buffer-state slot bound to its transfer function.
    pub fn buffer_state(dimension: Dimension, transfer: TransferFunction) -> Self {
        Self {
            id: SlotId::new(),
            dimension,
            kind: SlotKind::BufferState,
            transfer: Some(transfer),
            value: None,
            active: false,
        }
    }

    /// Return the slot's stable id.
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Return the slot's short name (the dimension's name).
    pub fn name(&self) -> &str {
        self.dimension.name()
    }

    /// Rename the slot. Used only by plant setup when resolving
    /// duplicate names.
    pub fn rename(&mut self, name: &str) {
        self.dimension.rename(name);
    }

    /// Return the slot's dimension.
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// Return the slot's kind.
    pub const fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Return the bound transfer function, if any.
    pub const fn transfer(&self) -> Option<&TransferFunction> {
        self.transfer.as_ref()
    }

    /// Return the current value (`None` when unset).
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Return the activation status.
    pub const fn status(&self) -> bool {
        self.active
    }

    /// Write a value through the dimension's coercion rules.
    ///
    /// On success the coerced value is stored and the slot activates;
    /// returns `true`. On failure the slot deactivates, its value is
    /// cleared, the rejection is logged, and `false` is returned. The
    /// writing site decides recovery; no error propagates.
    pub fn write(&mut self, value: f64) -> bool {
        match self.dimension.coerce(value) {
            Ok(coerced) => {
                self.value = Some(coerced);
                self.active = true;
                true
            }
            Err(reason) => {
                warn!(slot = self.dimension.name(), %reason, "write rejected");
                self.value = None;
                self.active = false;
                false
            }
        }
    }

    /// Deactivate the slot and clear its value.
    pub fn deactivate(&mut self) {
        self.value = None;
        self.active = false;
    }

    /// Numeric view used by the signal graph.
    ///
    /// `Tap::Value` reads the current value (unset reads as `0.0`);
    /// `Tap::Status` reads activation as `0.0` / `1.0`.
    pub fn reading(&self, tap: Tap) -> f64 {
        match tap {
            Tap::Value => self.value.unwrap_or(0.0),
            Tap::Status => {
                if self.active {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use matflow_types::Dimension;

    use super::*;
    use crate::transfer::TransferFunction;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn make_actuator() -> Slot {
        Slot::actuator(Dimension::real("rpm", 0.0, 100.0, "rpm").unwrap())
    }

    #[test]
    fn actuator_starts_deactivated() {
        let slot = make_actuator();
        assert!(!slot.status());
        assert!(slot.value().is_none());
        assert!(slot.transfer().is_none());
    }

    #[test]
    fn successful_write_activates() {
        let mut slot = make_actuator();
        assert!(slot.write(60.0));
        assert!(slot.status());
        assert!(close(slot.value().unwrap(), 60.0));
    }

    #[test]
    fn out_of_range_write_deactivates_and_clears() {
        let mut slot = make_actuator();
        assert!(slot.write(60.0));
        assert!(!slot.write(120.0));
        assert!(!slot.status());
        assert!(slot.value().is_none());
    }

    #[test]
    fn reading_unset_value_is_zero() {
        let slot = make_actuator();
        assert!(close(slot.reading(Tap::Value), 0.0));
        assert!(close(slot.reading(Tap::Status), 0.0));
    }

    #[test]
    fn reading_reflects_value_and_status() {
        let mut slot = make_actuator();
        let _ = slot.write(42.0);
        assert!(close(slot.reading(Tap::Value), 42.0));
        assert!(close(slot.reading(Tap::Status), 1.0));
    }

    #[test]
    fn sensor_carries_transfer_function() {
        let slot = Slot::sensor(
            Dimension::boolean("full"),
            TransferFunction::ThresholdSensor { theta: 4.5 },
        );
        assert_eq!(slot.kind(), SlotKind::Sensor);
        assert!(slot.transfer().is_some());
    }

    #[test]
    fn boolean_sensor_write_coerces_truthy() {
        let mut slot = Slot::sensor(
            Dimension::boolean("full"),
            TransferFunction::ThresholdSensor { theta: 4.5 },
        );
        assert!(slot.write(0.7));
        assert!(close(slot.value().unwrap(), 1.0));
    }

    #[test]
    fn deactivate_clears_value() {
        let mut slot = make_actuator();
        let _ = slot.write(10.0);
        slot.deactivate();
        assert!(!slot.status());
        assert!(slot.value().is_none());
    }

    #[test]
    fn rename_changes_slot_name() {
        let mut slot = make_actuator();
        slot.rename("rpm_2");
        assert_eq!(slot.name(), "rpm_2");
    }
}
