//! Reward types for multi-agent plant control.
//!
//! The adaptor computes one reward contribution per agent each tick and
//! packages the result in one of three flavors, selected at construction
//! through [`RewardMode`]:
//!
//! - **Overall**: a single scalar, the sum over all agents.
//! - **Per-agent**: one scalar per agent id.
//! - **Per-action**: each agent's scalar broadcast across its action
//!   dimensions (useful for learners that expect one signal per output).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;

/// Which reward flavor the adaptor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// A single scalar: the sum of all agent contributions.
    Overall,
    /// One scalar per agent.
    #[default]
    PerAgent,
    /// Each agent's scalar broadcast across its action dimensions.
    PerAction,
}

/// A computed reward in one of the three flavors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    /// Scalar overall reward.
    Overall(f64),
    /// Per-agent rewards keyed by agent id.
    PerAgent(BTreeMap<AgentId, f64>),
    /// Per-action rewards: each agent's contribution repeated once per
    /// action dimension.
    PerAction(BTreeMap<AgentId, Vec<f64>>),
}

impl Reward {
    /// Sum of all contributions, independent of flavor.
    ///
    /// For the per-action flavor each agent contributes its scalar once
    /// per action dimension, so the total counts the broadcast copies.
    pub fn total(&self) -> f64 {
        match self {
            Self::Overall(value) => *value,
            Self::PerAgent(map) => map.values().sum(),
            Self::PerAction(map) => map.values().flatten().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_total_is_identity() {
        let reward = Reward::Overall(2.5);
        assert!((reward.total() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn per_agent_total_sums_contributions() {
        let mut map = BTreeMap::new();
        map.insert(AgentId::new(), 1.0);
        map.insert(AgentId::new(), 2.0);
        let reward = Reward::PerAgent(map);
        assert!((reward.total() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn per_action_total_counts_broadcast_copies() {
        let mut map = BTreeMap::new();
        map.insert(AgentId::new(), vec![1.5, 1.5]);
        let reward = Reward::PerAction(map);
        assert!((reward.total() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn reward_mode_default_is_per_agent() {
        assert_eq!(RewardMode::default(), RewardMode::PerAgent);
    }
}
