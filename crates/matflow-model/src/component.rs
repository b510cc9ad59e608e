//! Components: named, ordered collections of slots.
//!
//! A [`Component`] models one physical plant element -- a silo, a belt,
//! a vacuum pump -- as the set of slots it contributes: actuators the
//! agent drives, sensors and buffer states the signal graph computes.
//! Slots keep their insertion order, which defines the flattened
//! iteration order used for positional action binding.
//!
//! Duplicate short names within one owner are legal at build time; plant
//! setup resolves them by appending a numeric suffix (or fails, when
//! auto-adjustment is disabled).

use matflow_types::{ComponentId, SlotId};
use serde::{Deserialize, Serialize};

use crate::slot::{Slot, SlotKind};

/// A named group of actuators, sensors, and buffer states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Stable identifier.
    id: ComponentId,
    /// Component name, unique within the owning plant after setup.
    name: String,
    /// Owned slots in insertion order.
    slots: Vec<Slot>,
}

impl Component {
    /// Create an empty component.
    pub fn new(name: &str) -> Self {
        Self {
            id: ComponentId::new(),
            name: name.to_owned(),
            slots: Vec::new(),
        }
    }

    /// Add a slot, preserving insertion order (builder style).
    #[must_use]
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Add a slot, preserving insertion order.
    pub fn add_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    /// Return the component's stable id.
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Return the component's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the component. Used only by plant setup when resolving
    /// duplicate element names.
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// All slots in insertion order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mutable view of all slots, for setup renames and graph writes.
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    /// Look up a slot by short name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name() == name)
    }

    /// Look up a slot by short name, mutably.
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.name() == name)
    }

    /// Look up a slot by id.
    pub fn slot_by_id(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == id)
    }

    /// Actuator slots in insertion order.
    pub fn actuators(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|slot| slot.kind() == SlotKind::Actuator)
    }

    /// Sensor slots in insertion order.
    pub fn sensors(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|slot| slot.kind() == SlotKind::Sensor)
    }

    /// Buffer-state slots in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|slot| slot.kind() == SlotKind::BufferState)
    }

    /// Deactivate every owned slot (cascading deactivation).
    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use matflow_types::Dimension;

    use super::*;
    use crate::transfer::TransferFunction;

    fn make_belt() -> Component {
        Component::new("belt")
            .with_slot(Slot::actuator(
                Dimension::real("rpm", 0.0, 100.0, "rpm").unwrap(),
            ))
            .with_slot(Slot::buffer_state(
                Dimension::accumulator("transported", "l"),
                TransferFunction::LinearBeltThroughput { coef: 0.1 },
            ))
            .with_slot(Slot::sensor(
                Dimension::boolean("running"),
                TransferFunction::ThresholdSensor { theta: 1.0 },
            ))
    }

    #[test]
    fn slots_keep_insertion_order() {
        let belt = make_belt();
        let names: Vec<&str> = belt.slots().iter().map(Slot::name).collect();
        assert_eq!(names, vec!["rpm", "transported", "running"]);
    }

    #[test]
    fn kind_filters_partition_slots() {
        let belt = make_belt();
        assert_eq!(belt.actuators().count(), 1);
        assert_eq!(belt.sensors().count(), 1);
        assert_eq!(belt.states().count(), 1);
    }

    #[test]
    fn lookup_by_name_and_id() {
        let belt = make_belt();
        let rpm = belt.slot("rpm").unwrap();
        assert_eq!(belt.slot_by_id(rpm.id()).unwrap().name(), "rpm");
        assert!(belt.slot("missing").is_none());
    }

    #[test]
    fn deactivate_all_cascades() {
        let mut belt = make_belt();
        assert!(belt.slot_mut("rpm").unwrap().write(50.0));
        belt.deactivate_all();
        assert!(belt.slots().iter().all(|slot| !slot.status()));
    }

    #[test]
    fn duplicate_names_allowed_until_setup() {
        let mut comp = Component::new("tandem");
        comp.add_slot(Slot::actuator(
            Dimension::real("duration", 0.0, 10.0, "s").unwrap(),
        ));
        comp.add_slot(Slot::actuator(
            Dimension::real("duration", 0.0, 10.0, "s").unwrap(),
        ));
        // Both slots exist; name resolution happens at plant setup.
        assert_eq!(comp.slots().len(), 2);
    }
}
