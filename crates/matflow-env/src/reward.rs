//! Multi-agent reward computation from margins, power, and demand.
//!
//! Each agent controls one transport element of the line and is scored
//! by three saturating contributions, each in `(0, 1]`:
//!
//! - **Margin**: how well the agent's upstream buffer sits inside its
//!   operating band, `1 / (1 + lr_margin * margin_i)`.
//! - **Power**: how little energy the agent's element drew,
//!   `1 / (1 + lr_power * power_i / (max_power_i / 1000))`.
//! - **Coupling**: the downstream buffer's margin for every agent but
//!   the last, `1 / (1 + lr_margin * margin_{i+1})`; the last agent is
//!   scored on demand satisfaction instead,
//!   `1 / (1 - lr_demand * demand_rate)` with `demand_rate <= 0`.
//!
//! The flavor of the packaged result (overall, per-agent, per-action)
//! is selected by the reward configuration.

use std::collections::BTreeMap;

use matflow_core::RewardConfig;
use matflow_types::{AgentId, Reward, RewardMode};

/// Per-agent inputs to one tick's reward computation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTickData {
    /// The agent being scored.
    pub agent_id: AgentId,
    /// The agent's action dimensionality (for per-action broadcast).
    pub action_dims: usize,
    /// Energy drawn by the agent's element this tick.
    pub power: f64,
    /// The element's maximum power draw (normalization reference,
    /// must be positive).
    pub max_power: f64,
}

/// One agent's scalar reward contribution.
///
/// `margin_next` is the downstream buffer's margin (`None` for the last
/// agent, which is scored on `demand_rate` instead).
pub fn agent_contribution(
    config: &RewardConfig,
    data: &AgentTickData,
    margin_own: f64,
    margin_next: Option<f64>,
    demand_rate: f64,
) -> f64 {
    let margin_term = 1.0 / (1.0 + config.lr_margin * margin_own);
    let power_term = 1.0 / (1.0 + config.lr_power * data.power / (data.max_power / 1000.0));
    let tail_term = match margin_next {
        Some(next) => 1.0 / (1.0 + config.lr_margin * next),
        None => 1.0 / (1.0 - config.lr_demand * demand_rate),
    };
    margin_term + power_term + tail_term
}

/// Compute the tick's reward in the configured flavor.
///
/// `margins` is aligned with the declared fill-level order: agent `i`
/// reads `margins[i]` as its own buffer and `margins[i + 1]` as the
/// downstream buffer. Missing entries read as zero margin.
pub fn compute(
    config: &RewardConfig,
    agents: &[AgentTickData],
    margins: &[f64],
    demand_rate: f64,
) -> Reward {
    let last = agents.len().saturating_sub(1);
    let contributions: Vec<(AgentId, usize, f64)> = agents
        .iter()
        .enumerate()
        .map(|(i, data)| {
            let margin_own = margins.get(i).copied().unwrap_or(0.0);
            let margin_next = if i == last {
                None
            } else {
                Some(
                    i.checked_add(1)
                        .and_then(|j| margins.get(j))
                        .copied()
                        .unwrap_or(0.0),
                )
            };
            let r = agent_contribution(config, data, margin_own, margin_next, demand_rate);
            (data.agent_id, data.action_dims, r)
        })
        .collect();

    match config.mode {
        RewardMode::Overall => Reward::Overall(contributions.iter().map(|(_, _, r)| r).sum()),
        RewardMode::PerAgent => Reward::PerAgent(
            contributions
                .into_iter()
                .map(|(agent_id, _, r)| (agent_id, r))
                .collect(),
        ),
        RewardMode::PerAction => Reward::PerAction(
            contributions
                .into_iter()
                .map(|(agent_id, dims, r)| (agent_id, vec![r; dims]))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
