//! Action types for agent-to-plant communication.
//!
//! Each tick the plant receives one [`ActionInput`] covering every
//! actuator. Plants declare at construction whether the action vector is
//! positionally aligned with the flattened actuator iteration order
//! (`actions_in_order = true`, the [`Ordered`] form) or keyed by actuator
//! id (the [`Keyed`] form).
//!
//! All action values are normalized into `[0, 1]`; the tick driver
//! denormalizes them into each actuator's physical range before writing.
//!
//! [`Ordered`]: ActionInput::Ordered
//! [`Keyed`]: ActionInput::Keyed

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AgentId, SlotId};

/// One tick's worth of actuator commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionInput {
    /// Values aligned positionally with the plant's flattened actuator
    /// iteration order.
    Ordered(Vec<f64>),

    /// Values keyed by actuator [`SlotId`]. Actuators missing from the
    /// map are deactivated for the tick.
    Keyed(BTreeMap<SlotId, f64>),
}

impl ActionInput {
    /// Number of actuator commands carried by this input.
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(values) => values.len(),
            Self::Keyed(map) => map.len(),
        }
    }

    /// Whether this input carries no commands at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single agent's action submission, as collected by the env layer
/// before flattening into an [`ActionInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// The submitting agent.
    pub agent_id: AgentId,
    /// Normalized action values in `[0, 1]`, one per action dimension of
    /// this agent.
    pub values: Vec<f64>,
    /// Submission timestamp (wall clock; for ordering and diagnostics
    /// only -- simulation time is tick-based).
    pub submitted_at: DateTime<Utc>,
}
