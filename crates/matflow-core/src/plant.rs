//! The plant: top-level container and entry point for simulation.
//!
//! A [`Plant`] owns its elements (components and modules), the flat
//! slot registry, the signal graph, and the clock. Lifecycle:
//!
//! 1. Build: [`add_element`] in material-flow order.
//! 2. [`setup`]: flatten slots, resolve duplicate names. One-shot.
//! 3. Wire: [`add_signal`] registers update edges in evaluation order.
//! 4. Drive: [`reset`] seeds state, [`simulate_reaction`] runs ticks.
//!
//! Construction problems (duplicate names, unknown slots, arity
//! mismatches, double-written targets) are all surfaced as
//! [`SetupError`] before the first tick; within a tick the only
//! degraded condition is a rejected write, which deactivates the
//! offending slot and continues.
//!
//! [`add_element`]: Plant::add_element
//! [`setup`]: Plant::setup
//! [`add_signal`]: Plant::add_signal
//! [`reset`]: Plant::reset
//! [`simulate_reaction`]: Plant::simulate_reaction

use matflow_model::{Element, Slot, SlotKind, Tap};
use matflow_types::{ActionInput, PlantId, SlotId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::clock::SimClock;
use crate::config::{PlantSettings, TerminalActuatorPolicy};
use crate::graph::{Provider, SignalEdge, SignalGraph, SlotKey};
use crate::registry::SlotRegistry;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur while assembling a plant.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// `setup` was called a second time.
    #[error("plant is already set up")]
    AlreadySetUp,

    /// An operation that requires `setup` ran before it.
    #[error("plant is not set up yet")]
    NotSetUp,

    /// Two slots share a short name and auto-adjustment is disabled.
    #[error("duplicate slot name '{name}' (auto_adjust_names disabled)")]
    DuplicateSlotName {
        /// The colliding name.
        name: String,
    },

    /// A referenced slot does not exist.
    #[error("unknown slot '{name}'")]
    UnknownSlot {
        /// The unresolved name.
        name: String,
    },

    /// A signal target carries no transfer function (actuators cannot
    /// be written by the graph).
    #[error("slot '{name}' has no bound transfer function; it cannot be a signal target")]
    UnboundTarget {
        /// The rejected target.
        name: String,
    },

    /// A second edge tried to write an already-targeted slot.
    #[error("slot '{name}' is already written by another edge")]
    DuplicateTarget {
        /// The doubly-targeted slot.
        name: String,
    },

    /// The provider count does not satisfy the target's transfer
    /// function arity.
    #[error("slot '{name}' ({kind}): {got} providers do not satisfy the transfer arity")]
    BadArity {
        /// The target slot.
        name: String,
        /// The transfer function kind.
        kind: &'static str,
        /// Providers supplied.
        got: usize,
    },
}

/// Top-level simulation unit: elements, registry, signal graph, clock.
#[derive(Debug)]
pub struct Plant {
    /// Stable identifier.
    id: PlantId,
    /// Plant name (from settings).
    name: String,
    /// Elements in material-flow order.
    elements: Vec<Element>,
    /// Flat slot registry; empty until `setup`.
    registry: SlotRegistry,
    /// The signal graph, in registration order.
    graph: SignalGraph,
    /// Tick counter and simulated time.
    clock: SimClock,
    /// Whether action vectors bind positionally.
    actions_in_order: bool,
    /// Terminal demand-actuator handling.
    terminal_policy: TerminalActuatorPolicy,
    /// Seed used by `reset` when none is supplied.
    default_seed: u64,
    /// Flagged overflow accounting states.
    overflow_marks: Vec<SlotKey>,
    /// Flagged energy accounting states.
    power_marks: Vec<SlotKey>,
    /// Flagged transported-material accounting states.
    transport_marks: Vec<SlotKey>,
    /// Flagged produced-inventory accounting states.
    inventory_marks: Vec<SlotKey>,
    /// Set once `setup` has run.
    is_setup: bool,
}

impl Plant {
    /// Create an empty plant from settings.
    pub fn new(settings: &PlantSettings) -> Self {
        Self {
            id: PlantId::new(),
            name: settings.name.clone(),
            elements: Vec::new(),
            registry: SlotRegistry::default(),
            graph: SignalGraph::new(),
            clock: SimClock::new(),
            actions_in_order: settings.actions_in_order,
            terminal_policy: settings.terminal_actuator,
            default_seed: settings.seed,
            overflow_marks: Vec::new(),
            power_marks: Vec::new(),
            transport_marks: Vec::new(),
            inventory_marks: Vec::new(),
            is_setup: false,
        }
    }

    /// Return the plant's stable id.
    pub const fn id(&self) -> PlantId {
        self.id
    }

    /// Return the plant's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether action vectors bind positionally to actuator order.
    pub const fn actions_in_order(&self) -> bool {
        self.actions_in_order
    }

    /// Terminal demand-actuator handling.
    pub const fn terminal_policy(&self) -> TerminalActuatorPolicy {
        self.terminal_policy
    }

    /// Current clock state.
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Mutable clock access for the tick driver.
    pub(crate) fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// The signal graph.
    pub const fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    /// Add an element (component or module) before setup.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AlreadySetUp`] after `setup` has run.
    pub fn add_element(&mut self, element: impl Into<Element>) -> Result<(), SetupError> {
        if self.is_setup {
            return Err(SetupError::AlreadySetUp);
        }
        self.elements.push(element.into());
        Ok(())
    }

    /// Flatten all slots into the registry and resolve name collisions.
    ///
    /// Must run exactly once, after all elements are added and before
    /// any signal is registered.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AlreadySetUp`] on a second call, or
    /// [`SetupError::DuplicateSlotName`] on a collision when
    /// `auto_adjust_names` is disabled.
    pub fn setup(&mut self, auto_adjust_names: bool) -> Result<(), SetupError> {
        if self.is_setup {
            return Err(SetupError::AlreadySetUp);
        }
        self.registry = SlotRegistry::build(&mut self.elements, auto_adjust_names)?;
        self.is_setup = true;
        info!(
            plant = self.name.as_str(),
            slots = self.registry.len(),
            "plant set up"
        );
        Ok(())
    }

    /// Register one update edge: `target` is computed from `providers`
    /// (in order) by the target's bound transfer function.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NotSetUp`] before `setup`,
    /// [`SetupError::UnknownSlot`] for unresolved names,
    /// [`SetupError::UnboundTarget`] if the target has no transfer
    /// function, [`SetupError::DuplicateTarget`] if the target already
    /// has a writer, and [`SetupError::BadArity`] on a provider-count
    /// mismatch.
    pub fn add_signal(
        &mut self,
        target: &str,
        providers: &[(&str, Tap)],
    ) -> Result<(), SetupError> {
        if !self.is_setup {
            return Err(SetupError::NotSetUp);
        }

        let target_key = self.key(target).ok_or_else(|| SetupError::UnknownSlot {
            name: target.to_owned(),
        })?;
        if self.graph.has_target(target_key) {
            return Err(SetupError::DuplicateTarget {
                name: target.to_owned(),
            });
        }

        let transfer = self
            .slot(target_key)
            .and_then(|slot| slot.transfer().cloned())
            .ok_or_else(|| SetupError::UnboundTarget {
                name: target.to_owned(),
            })?;
        if !transfer.accepts_arity(providers.len()) {
            return Err(SetupError::BadArity {
                name: target.to_owned(),
                kind: transfer.kind(),
                got: providers.len(),
            });
        }

        let mut resolved = Vec::with_capacity(providers.len());
        for (name, tap) in providers {
            let slot = self.key(name).ok_or_else(|| SetupError::UnknownSlot {
                name: (*name).to_owned(),
            })?;
            resolved.push(Provider { slot, tap: *tap });
        }

        debug!(target, providers = providers.len(), "signal registered");
        self.graph.push(SignalEdge {
            target: target_key,
            providers: resolved,
        });
        Ok(())
    }

    /// Resolve a slot name to its key.
    pub fn key(&self, name: &str) -> Option<SlotKey> {
        self.registry.key_by_name(name)
    }

    /// Resolve a slot id to its key.
    pub fn key_by_id(&self, id: SlotId) -> Option<SlotKey> {
        self.registry.key_by_id(id)
    }

    /// The slot behind a key.
    pub fn slot(&self, key: SlotKey) -> Option<&Slot> {
        let addr = self.registry.addr(key)?;
        self.elements
            .get(addr.element)?
            .components()
            .get(addr.component)?
            .slots()
            .get(addr.slot)
    }

    /// The slot behind a name.
    pub fn slot_by_name(&self, name: &str) -> Option<&Slot> {
        self.slot(self.key(name)?)
    }

    /// Mutable slot access for the tick driver and reset.
    pub(crate) fn slot_mut(&mut self, key: SlotKey) -> Option<&mut Slot> {
        let addr = self.registry.addr(key)?;
        self.elements
            .get_mut(addr.element)?
            .components_mut()
            .get_mut(addr.component)?
            .slots_mut()
            .get_mut(addr.slot)
    }

    /// Current value of a named slot (`None` when unset or unknown).
    pub fn value(&self, name: &str) -> Option<f64> {
        self.slot_by_name(name).and_then(Slot::value)
    }

    /// Activation status of a named slot (`false` when unknown).
    pub fn status(&self, name: &str) -> bool {
        self.slot_by_name(name).is_some_and(Slot::status)
    }

    /// Force a buffer state to a specific level (test fixtures, state
    /// restoration). Goes through the regular write contract.
    ///
    /// Returns whether the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSlot`] for an unresolved name.
    pub fn set_state(&mut self, name: &str, value: f64) -> Result<bool, SetupError> {
        let key = self.key(name).ok_or_else(|| SetupError::UnknownSlot {
            name: name.to_owned(),
        })?;
        Ok(self.slot_mut(key).is_some_and(|slot| slot.write(value)))
    }

    /// Flattened, name-indexed view of all actuators in iteration order.
    pub fn get_actuators(&self) -> Vec<(String, SlotKey)> {
        self.named_view(self.registry.actuator_keys())
    }

    /// Flattened, name-indexed view of all sensors in iteration order.
    pub fn get_sensors(&self) -> Vec<(String, SlotKey)> {
        self.named_view(self.registry.sensor_keys())
    }

    /// Flattened, name-indexed view of all buffer states in iteration
    /// order.
    pub fn get_component_states(&self) -> Vec<(String, SlotKey)> {
        self.named_view(self.registry.state_keys())
    }

    /// Number of actuators (the expected ordered-action length).
    pub fn actuator_count(&self) -> usize {
        self.registry.actuator_keys().len()
    }

    /// Actuator keys in flattened iteration order.
    pub(crate) fn actuator_keys(&self) -> Vec<SlotKey> {
        self.registry.actuator_keys().to_vec()
    }

    fn named_view(&self, keys: &[SlotKey]) -> Vec<(String, SlotKey)> {
        keys.iter()
            .filter_map(|&key| Some((self.slot(key)?.name().to_owned(), key)))
            .collect()
    }

    /// Mark a buffer state as an overflow accounting slot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSlot`] for an unresolved name.
    pub fn mark_overflow(&mut self, name: &str) -> Result<(), SetupError> {
        let key = self.require_key(name)?;
        self.overflow_marks.push(key);
        Ok(())
    }

    /// Mark a buffer state as an energy accounting slot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSlot`] for an unresolved name.
    pub fn mark_power(&mut self, name: &str) -> Result<(), SetupError> {
        let key = self.require_key(name)?;
        self.power_marks.push(key);
        Ok(())
    }

    /// Mark a buffer state as a transported-material accounting slot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSlot`] for an unresolved name.
    pub fn mark_transport(&mut self, name: &str) -> Result<(), SetupError> {
        let key = self.require_key(name)?;
        self.transport_marks.push(key);
        Ok(())
    }

    /// Mark a buffer state as a produced-inventory accounting slot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSlot`] for an unresolved name.
    pub fn mark_inventory(&mut self, name: &str) -> Result<(), SetupError> {
        let key = self.require_key(name)?;
        self.inventory_marks.push(key);
        Ok(())
    }

    fn require_key(&self, name: &str) -> Result<SlotKey, SetupError> {
        self.key(name).ok_or_else(|| SetupError::UnknownSlot {
            name: name.to_owned(),
        })
    }

    fn sum_marks(&self, marks: &[SlotKey]) -> f64 {
        marks
            .iter()
            .filter_map(|&key| self.slot(key).and_then(Slot::value))
            .sum()
    }

    fn marks_vector(&self, marks: &[SlotKey]) -> Vec<f64> {
        marks
            .iter()
            .map(|&key| self.slot(key).and_then(Slot::value).unwrap_or(0.0))
            .collect()
    }

    /// Total overflow across flagged states this tick.
    pub fn total_overflow(&self) -> f64 {
        self.sum_marks(&self.overflow_marks)
    }

    /// Per-state overflow vector, in mark order.
    pub fn overflow_values(&self) -> Vec<f64> {
        self.marks_vector(&self.overflow_marks)
    }

    /// Total energy drawn across flagged states this tick.
    pub fn total_power(&self) -> f64 {
        self.sum_marks(&self.power_marks)
    }

    /// Per-state energy vector, in mark order.
    pub fn power_values(&self) -> Vec<f64> {
        self.marks_vector(&self.power_marks)
    }

    /// Total material transported across flagged states this tick.
    pub fn total_transport(&self) -> f64 {
        self.sum_marks(&self.transport_marks)
    }

    /// Per-state transported-material vector, in mark order.
    pub fn transport_values(&self) -> Vec<f64> {
        self.marks_vector(&self.transport_marks)
    }

    /// Total produced inventory across flagged states.
    pub fn total_inventory(&self) -> f64 {
        self.sum_marks(&self.inventory_marks)
    }

    /// Deactivate actuators and sensors, seed buffer levels, zero
    /// accumulators, and rewind the clock.
    ///
    /// Buffer states with finite bounds are drawn uniformly at random
    /// within their range from a generator seeded by `seed` (falling
    /// back to the configured default), so runs are reproducible.
    /// Unbounded accumulator states (overflow, energy, transported
    /// material, inventory) are zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NotSetUp`] before `setup`.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(), SetupError> {
        if !self.is_setup {
            return Err(SetupError::NotSetUp);
        }
        let seed = seed.unwrap_or(self.default_seed);
        let mut rng = StdRng::seed_from_u64(seed);

        for element in &mut self.elements {
            for component in element.components_mut() {
                for slot in component.slots_mut() {
                    match slot.kind() {
                        SlotKind::Actuator | SlotKind::Sensor => slot.deactivate(),
                        SlotKind::BufferState => {
                            let dim = slot.dimension();
                            let level = if dim.is_bounded() && dim.span() > 0.0 {
                                rng.random_range(dim.lower()..=dim.upper())
                            } else if dim.is_bounded() {
                                dim.lower()
                            } else {
                                0.0
                            };
                            let _ = slot.write(level);
                        }
                    }
                }
            }
        }

        self.clock.reset();
        debug!(plant = self.name.as_str(), seed, "plant reset");
        Ok(())
    }

    /// Run one simulation tick: write actuators from `action`, evaluate
    /// the signal graph over `dt`, and account the aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] for structural problems (unset-up plant,
    /// action arity, invalid duration, clock overflow). Per-slot write
    /// rejections do not fail the tick.
    pub fn simulate_reaction(
        &mut self,
        action: &ActionInput,
        dt: f64,
    ) -> Result<TickSummary, TickError> {
        tick::run_tick(self, action, dt)
    }

    /// Whether `setup` has completed.
    pub const fn is_setup(&self) -> bool {
        self.is_setup
    }
}
