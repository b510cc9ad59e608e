//! Observation assembly: normalized buffer levels in declared order.
//!
//! The adaptor declares once, at construction, which buffer states form
//! the observation vector. Each tick the current levels are normalized
//! into `[0, 1]` against their dimension bounds and assembled into a
//! fixed-dimension [`Observation`]. Only bounded buffer states are
//! observable; accumulators have no ceiling to normalize against and
//! are rejected at construction.

use matflow_core::{Plant, SlotKey};
use matflow_model::SlotKind;
use matflow_types::Observation;

use crate::error::EnvError;

/// Resolve declared fill-level names into slot keys, validating that
/// each is a bounded buffer state.
///
/// # Errors
///
/// Returns [`EnvError::UnknownState`] for unresolved names and
/// [`EnvError::NotObservable`] for slots that are not bounded buffer
/// states.
pub fn resolve_fill_levels(plant: &Plant, names: &[&str]) -> Result<Vec<SlotKey>, EnvError> {
    let mut keys = Vec::with_capacity(names.len());
    for name in names {
        let key = plant.key(name).ok_or_else(|| EnvError::UnknownState {
            name: (*name).to_owned(),
        })?;
        let observable = plant.slot(key).is_some_and(|slot| {
            slot.kind() == SlotKind::BufferState
                && slot.dimension().is_bounded()
                && slot.dimension().span() > 0.0
        });
        if !observable {
            return Err(EnvError::NotObservable {
                name: (*name).to_owned(),
            });
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Assemble the observation vector from the resolved fill-level keys.
///
/// Levels are normalized against their dimension bounds and clamped
/// into `[0, 1]`; an unset level reads as the dimension's lower bound.
pub fn assemble(plant: &Plant, fill_keys: &[SlotKey]) -> Observation {
    let values = fill_keys
        .iter()
        .map(|&key| {
            plant.slot(key).map_or(0.0, |slot| {
                let dim = slot.dimension();
                let level = slot.value().unwrap_or_else(|| dim.lower());
                dim.normalize(level).unwrap_or(0.0).clamp(0.0, 1.0)
            })
        })
        .collect();
    Observation {
        tick: plant.clock().tick(),
        values,
    }
}
