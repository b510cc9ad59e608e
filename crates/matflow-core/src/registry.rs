//! The flat slot registry built at plant setup.
//!
//! Elements own their slots; the registry flattens them into one
//! address table so that signal edges, action binding, and accounting
//! can refer to any slot by a cheap [`SlotKey`] instead of a borrow.
//! Iteration order is element insertion order, then component order,
//! then slot order -- the order agent action vectors are bound in.
//!
//! The registry also owns the shared name space: duplicate short names
//! across the whole plant are resolved here by appending a numeric
//! suffix (when auto-adjustment is enabled) or rejected.

use std::collections::BTreeMap;

use matflow_model::{Element, SlotKind};
use matflow_types::SlotId;
use tracing::debug;

use crate::graph::SlotKey;
use crate::plant::SetupError;

/// Location of one slot inside the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAddr {
    /// Index of the owning element.
    pub element: usize,
    /// Index of the owning component within the element.
    pub component: usize,
    /// Index of the slot within the component.
    pub slot: usize,
}

/// Flat, name- and id-indexed view over every slot of a plant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRegistry {
    /// Address of each slot, indexed by [`SlotKey`].
    addrs: Vec<SlotAddr>,
    /// Resolved short name -> key.
    by_name: BTreeMap<String, SlotKey>,
    /// Slot id -> key.
    by_id: BTreeMap<SlotId, SlotKey>,
    /// Actuator keys in flattened iteration order.
    actuators: Vec<SlotKey>,
    /// Sensor keys in flattened iteration order.
    sensors: Vec<SlotKey>,
    /// Buffer-state keys in flattened iteration order.
    states: Vec<SlotKey>,
}

impl SlotRegistry {
    /// Flatten `elements` into a registry, resolving name collisions.
    ///
    /// With `auto_adjust_names` a colliding short name gets a numeric
    /// suffix (`level` -> `level_2`, `level_3`, ...) written back into
    /// the slot; without it the first collision is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::DuplicateSlotName`] on a collision when
    /// auto-adjustment is disabled.
    pub fn build(elements: &mut [Element], auto_adjust_names: bool) -> Result<Self, SetupError> {
        let mut registry = Self::default();

        for (element_idx, element) in elements.iter_mut().enumerate() {
            for (component_idx, component) in element.components_mut().iter_mut().enumerate() {
                let component_name = component.name().to_owned();
                for (slot_idx, slot) in component.slots_mut().iter_mut().enumerate() {
                    let original = slot.name().to_owned();
                    if registry.by_name.contains_key(&original) {
                        if !auto_adjust_names {
                            return Err(SetupError::DuplicateSlotName { name: original });
                        }
                        let adjusted = registry.free_name(&original);
                        debug!(
                            component = component_name.as_str(),
                            from = original.as_str(),
                            to = adjusted.as_str(),
                            "renamed duplicate slot"
                        );
                        slot.rename(&adjusted);
                    }

                    let key = SlotKey(registry.addrs.len());
                    registry.addrs.push(SlotAddr {
                        element: element_idx,
                        component: component_idx,
                        slot: slot_idx,
                    });
                    registry.by_name.insert(slot.name().to_owned(), key);
                    registry.by_id.insert(slot.id(), key);
                    match slot.kind() {
                        SlotKind::Actuator => registry.actuators.push(key),
                        SlotKind::Sensor => registry.sensors.push(key),
                        SlotKind::BufferState => registry.states.push(key),
                    }
                }
            }
        }

        Ok(registry)
    }

    /// First non-colliding suffixed variant of `name`.
    fn free_name(&self, name: &str) -> String {
        for suffix in 2_u32.. {
            let candidate = format!("{name}_{suffix}");
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
        }
        // A plant cannot hold u32::MAX slots of one name.
        format!("{name}_overflowed")
    }

    /// Address of the slot behind `key`.
    pub fn addr(&self, key: SlotKey) -> Option<SlotAddr> {
        self.addrs.get(key.index()).copied()
    }

    /// Key for a resolved short name.
    pub fn key_by_name(&self, name: &str) -> Option<SlotKey> {
        self.by_name.get(name).copied()
    }

    /// Key for a slot id.
    pub fn key_by_id(&self, id: SlotId) -> Option<SlotKey> {
        self.by_id.get(&id).copied()
    }

    /// Actuator keys in flattened iteration order.
    pub fn actuator_keys(&self) -> &[SlotKey] {
        &self.actuators
    }

    /// Sensor keys in flattened iteration order.
    pub fn sensor_keys(&self) -> &[SlotKey] {
        &self.sensors
    }

    /// Buffer-state keys in flattened iteration order.
    pub fn state_keys(&self) -> &[SlotKey] {
        &self.states
    }

    /// Total number of registered slots.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Whether the registry holds no slots.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use matflow_model::{Component, Slot, TransferFunction};
    use matflow_types::Dimension;

    use super::*;

    fn make_silo(component: &str) -> Element {
        Component::new(component)
            .with_slot(Slot::buffer_state(
                Dimension::real("level", 0.0, 10.0, "l").unwrap(),
                TransferFunction::FillLevel {
                    max_vol: 10.0,
                    min_vol: 0.0,
                },
            ))
            .with_slot(Slot::actuator(
                Dimension::real("rpm", 0.0, 100.0, "rpm").unwrap(),
            ))
            .into()
    }

    #[test]
    fn flattening_preserves_iteration_order() {
        let mut elements = vec![make_silo("a"), make_silo("b")];
        let registry = SlotRegistry::build(&mut elements, true).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.actuator_keys().len(), 2);
        assert_eq!(registry.state_keys().len(), 2);
        // First actuator belongs to the first element.
        let key = registry.actuator_keys().first().copied().unwrap();
        assert_eq!(registry.addr(key).unwrap().element, 0);
    }

    #[test]
    fn duplicate_names_get_suffixed() {
        let mut elements = vec![make_silo("a"), make_silo("b")];
        let registry = SlotRegistry::build(&mut elements, true).unwrap();
        assert!(registry.key_by_name("level").is_some());
        assert!(registry.key_by_name("level_2").is_some());
        assert!(registry.key_by_name("rpm_2").is_some());
        // The rename is written back into the slot itself.
        let renamed = elements
            .get(1)
            .and_then(|e| e.components().first())
            .and_then(|c| c.slot("level_2"));
        assert!(renamed.is_some());
    }

    #[test]
    fn duplicate_names_fatal_without_auto_adjust() {
        let mut elements = vec![make_silo("a"), make_silo("b")];
        let result = SlotRegistry::build(&mut elements, false);
        assert!(matches!(
            result,
            Err(SetupError::DuplicateSlotName { .. })
        ));
    }

    #[test]
    fn lookup_by_id_matches_lookup_by_name() {
        let mut elements = vec![make_silo("a")];
        let registry = SlotRegistry::build(&mut elements, true).unwrap();
        let slot_id = elements
            .first()
            .and_then(|e| e.components().first())
            .and_then(|c| c.slot("level"))
            .map(Slot::id)
            .unwrap();
        assert_eq!(
            registry.key_by_id(slot_id),
            registry.key_by_name("level")
        );
    }
}
