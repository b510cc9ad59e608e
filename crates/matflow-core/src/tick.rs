//! The per-tick driver: actions in, graph evaluation, accounting out.
//!
//! One tick is one transaction over the plant state:
//!
//! 1. **Write actuators** -- denormalize the agent action vector into
//!    each actuator's physical range (positionally or keyed, per plant
//!    configuration); the terminal demand actuator follows the
//!    configured policy.
//! 2. **Snapshot pre-tick inventory** for demand accounting.
//! 3. **Evaluate the signal graph** in registration order with
//!    immediate write-through; provider readings are snapshotted before
//!    each write, so fill-level edges observe pre-tick buffer levels.
//! 4. **Compute aggregates** from the flagged overflow, energy,
//!    transported-material, and inventory states.
//! 5. **Advance the clock** and assemble the [`TickSummary`].
//!
//! There are no suspension points and no mid-tick cancellation: the
//! driver is purely compute-bound and always runs to completion. A
//! rejected write (out-of-range action, out-of-range transfer result)
//! deactivates the offending slot, is recorded in the summary, and the
//! tick continues -- dependent transfer functions observe the inactive
//! slot as `0`.

use matflow_model::{Slot, TransferError};
use matflow_types::ActionInput;
use tracing::info;

use crate::clock::{ClockError, SimClock};
use crate::config::TerminalActuatorPolicy;
use crate::graph::SlotKey;
use crate::plant::Plant;

/// Errors that abort a tick before it mutates state.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The plant has not completed `setup`.
    #[error("plant is not set up")]
    NotSetUp,

    /// An ordered action vector does not match the actuator count.
    #[error("action vector length {got} does not match actuator count {expected}")]
    ActionArity {
        /// Number of actuators in iteration order.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },

    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A transfer function rejected its input tuple. This indicates a
    /// wiring bug that slipped past registration validation.
    #[error("transfer evaluation failed for slot '{slot}': {source}")]
    Transfer {
        /// The target slot.
        slot: String,
        /// The underlying transfer error.
        source: TransferError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated time at the end of the tick.
    pub t: f64,
    /// Duration of this tick.
    pub dt: f64,
    /// Total overflow across flagged states this tick.
    pub overflow: f64,
    /// Total energy drawn across flagged states this tick.
    pub power: f64,
    /// Total material transported across flagged states this tick.
    pub transported: f64,
    /// Produced inventory before the tick.
    pub pre_inventory: f64,
    /// Produced inventory after the tick.
    pub inventory: f64,
    /// Inventory delivered during this tick.
    pub delivered: f64,
    /// Names of slots whose writes were rejected this tick.
    pub rejected_writes: Vec<String>,
}

/// Execute one complete tick of the plant.
///
/// This is the engine entry point behind [`Plant::simulate_reaction`].
///
/// # Errors
///
/// Returns [`TickError`] only for structural problems detected before
/// or during evaluation (unset-up plant, action arity, invalid
/// duration, clock overflow, arity bug). Per-slot write rejections are
/// reported through [`TickSummary::rejected_writes`] instead.
pub fn run_tick(
    plant: &mut Plant,
    action: &ActionInput,
    dt: f64,
) -> Result<TickSummary, TickError> {
    if !plant.is_setup() {
        return Err(TickError::NotSetUp);
    }
    SimClock::validate(dt)?;

    let mut rejected_writes = Vec::new();

    // --- Step 1: write actuators from the action vector ---
    write_actuators(plant, action, &mut rejected_writes)?;

    // --- Step 2: snapshot pre-tick inventory ---
    let pre_inventory = plant.total_inventory();

    // --- Step 3: evaluate the signal graph in registration order ---
    evaluate_graph(plant, dt, &mut rejected_writes)?;

    // --- Step 4: aggregates from the flagged accounting states ---
    let overflow = plant.total_overflow();
    let power = plant.total_power();
    let transported = plant.total_transport();
    let inventory = plant.total_inventory();
    let delivered = inventory - pre_inventory;

    // --- Step 5: advance the clock ---
    let tick = plant.clock_mut().advance(dt)?;
    info!(
        tick,
        overflow, power, transported, delivered, "tick completed"
    );

    Ok(TickSummary {
        tick,
        t: plant.clock().t(),
        dt,
        overflow,
        power,
        transported,
        pre_inventory,
        inventory,
        delivered,
        rejected_writes,
    })
}

/// Write the action vector into the actuator slots.
fn write_actuators(
    plant: &mut Plant,
    action: &ActionInput,
    rejected: &mut Vec<String>,
) -> Result<(), TickError> {
    let keys = plant.actuator_keys();
    let policy = plant.terminal_policy();
    let last = keys.len().checked_sub(1);

    match action {
        ActionInput::Ordered(values) => {
            if values.len() != keys.len() {
                return Err(TickError::ActionArity {
                    expected: keys.len(),
                    got: values.len(),
                });
            }
            for (pos, (&key, &a)) in keys.iter().zip(values.iter()).enumerate() {
                let is_terminal = last == Some(pos);
                write_actuator(plant, key, Some(a), is_terminal, policy, rejected);
            }
        }
        ActionInput::Keyed(map) => {
            for (pos, &key) in keys.iter().enumerate() {
                let is_terminal = last == Some(pos);
                let a = plant
                    .slot(key)
                    .map(Slot::id)
                    .and_then(|id| map.get(&id))
                    .copied();
                write_actuator(plant, key, a, is_terminal, policy, rejected);
            }
        }
    }
    Ok(())
}

/// Write one actuator: denormalize and apply the terminal policy.
///
/// An absent action (keyed mode, no entry) deactivates the actuator for
/// this tick. The terminal demand actuator is forced active under
/// [`TerminalActuatorPolicy::ForceActive`], regardless of the input.
fn write_actuator(
    plant: &mut Plant,
    key: SlotKey,
    a: Option<f64>,
    is_terminal: bool,
    policy: TerminalActuatorPolicy,
    rejected: &mut Vec<String>,
) {
    let Some(slot) = plant.slot_mut(key) else {
        return;
    };

    let force_active = is_terminal && policy == TerminalActuatorPolicy::ForceActive;
    let physical = if force_active {
        slot.dimension().denormalize(1.0)
    } else {
        match a {
            Some(a) => slot.dimension().denormalize(a),
            None => {
                slot.deactivate();
                return;
            }
        }
    };

    if !slot.write(physical) {
        rejected.push(slot.name().to_owned());
    }
}

/// Evaluate every edge in registration order with write-through.
fn evaluate_graph(
    plant: &mut Plant,
    dt: f64,
    rejected: &mut Vec<String>,
) -> Result<(), TickError> {
    for idx in 0..plant.graph().len() {
        let Some(edge) = plant.graph().edge(idx).cloned() else {
            continue;
        };

        // Snapshot all provider readings before the write, so an edge
        // whose target is also a provider sees its pre-edge value.
        let inputs: Vec<f64> = edge
            .providers
            .iter()
            .map(|p| plant.slot(p.slot).map_or(0.0, |slot| slot.reading(p.tap)))
            .collect();

        let Some((transfer, name)) = plant
            .slot(edge.target)
            .and_then(|slot| Some((slot.transfer()?.clone(), slot.name().to_owned())))
        else {
            // Unbound targets are rejected at registration.
            continue;
        };

        let result = transfer
            .evaluate(&inputs, Some(dt))
            .map_err(|source| TickError::Transfer {
                slot: name.clone(),
                source,
            })?;

        if let Some(slot) = plant.slot_mut(edge.target) {
            if !slot.write(result) {
                rejected.push(name);
            }
        }
    }
    Ok(())
}
