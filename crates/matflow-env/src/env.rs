//! The plant-to-agent adaptor: observations, rewards, telemetry.
//!
//! [`PlantEnv`] wraps a set-up [`Plant`] and exposes the step/reset
//! interface learning agents expect: `reset` seeds the plant and
//! returns the first observation; `step` runs one tick and returns the
//! next observation, the reward in the configured flavor, and the
//! episode flags. The env is `ready` after a reset and stays ready --
//! the state machine is `ready -> ticking -> ready` with no observable
//! intermediate state, since a tick runs to completion synchronously.
//!
//! # Episode semantics
//!
//! In continuous mode (`batch_target = None`) `success` is always
//! `false` and the plant runs indefinitely. In batch mode `success`
//! turns `true` once cumulative delivered inventory reaches the target;
//! the tick itself still completes cleanly. `broken` is always `false`
//! for this plant family.

use matflow_core::{
    MarginConfig, Plant, ProductionConfig, RewardConfig, SimulationConfig, SlotKey,
};
use matflow_types::{
    ActionInput, AgentId, Observation, Reward, TelemetryRecord,
};
use tracing::debug;

use crate::error::EnvError;
use crate::margin::margin;
use crate::observation::{assemble, resolve_fill_levels};
use crate::reward::{self, AgentTickData};
use crate::source::ActionSource;

/// Binding of one agent to its plant element.
///
/// Serializable so concrete plants can load their agent roster as data
/// alongside the transfer-function coefficients.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AgentSpec {
    /// The agent's identity.
    pub agent_id: AgentId,
    /// Human-readable agent name (diagnostics only).
    pub name: String,
    /// Number of action dimensions this agent submits.
    pub action_dims: usize,
    /// Name of the energy accounting state of the agent's element, if
    /// it has one. `None` scores the power term as ideal.
    pub power_state: Option<String>,
    /// The element's maximum power draw (positive; normalization
    /// reference for the power term).
    pub max_power: f64,
}

/// An agent binding with its power state resolved to a slot key.
#[derive(Debug, Clone)]
struct ResolvedAgent {
    /// The original binding.
    spec: AgentSpec,
    /// Resolved power state, if declared.
    power_key: Option<SlotKey>,
}

/// Result of one env step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Normalized observation after the tick.
    pub observation: Observation,
    /// Reward in the configured flavor.
    pub reward: Reward,
    /// Batch-mode success flag (cumulative production reached the
    /// target). Always `false` in continuous mode.
    pub success: bool,
    /// Whether the plant broke this tick. Always `false` for this
    /// plant family.
    pub broken: bool,
}

/// A set-up plant wrapped for agent interaction.
#[derive(Debug)]
pub struct PlantEnv {
    /// The wrapped plant.
    plant: Plant,
    /// Agent bindings in reward order.
    agents: Vec<ResolvedAgent>,
    /// Observed buffer states in declared order.
    fill_keys: Vec<SlotKey>,
    /// Margin band configuration.
    margin_config: MarginConfig,
    /// Reward flavor and coefficients.
    reward_config: RewardConfig,
    /// Production and demand targets.
    production: ProductionConfig,
    /// Per-tick telemetry stream since the last reset.
    telemetry: Vec<TelemetryRecord>,
    /// Cumulative delivered inventory since the last reset.
    cumulative_delivered: f64,
    /// Set by the first `reset`.
    ready: bool,
}

impl PlantEnv {
    /// Wrap a set-up plant.
    ///
    /// `fill_levels` declares the observed buffer states in observation
    /// order; `agents` declares the reward order (the last agent is the
    /// demand-side agent).
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::PlantNotSetUp`], [`EnvError::NoAgents`], or
    /// a resolution error for unknown/unobservable states and broken
    /// agent bindings.
    pub fn new(
        plant: Plant,
        config: &SimulationConfig,
        fill_levels: &[&str],
        agents: Vec<AgentSpec>,
    ) -> Result<Self, EnvError> {
        if !plant.is_setup() {
            return Err(EnvError::PlantNotSetUp);
        }
        if agents.is_empty() {
            return Err(EnvError::NoAgents);
        }

        let fill_keys = resolve_fill_levels(&plant, fill_levels)?;

        let mut resolved = Vec::with_capacity(agents.len());
        for spec in agents {
            if spec.max_power <= 0.0 {
                return Err(EnvError::NonPositiveMaxPower {
                    agent: spec.name.clone(),
                    max_power: spec.max_power,
                });
            }
            let power_key = match &spec.power_state {
                Some(name) => Some(plant.key(name).ok_or_else(|| {
                    EnvError::UnknownPowerState {
                        agent: spec.name.clone(),
                        name: name.clone(),
                    }
                })?),
                None => None,
            };
            resolved.push(ResolvedAgent { spec, power_key });
        }

        Ok(Self {
            plant,
            agents: resolved,
            fill_keys,
            margin_config: config.margin.clone(),
            reward_config: config.reward.clone(),
            production: config.production.clone(),
            telemetry: Vec::new(),
            cumulative_delivered: 0.0,
            ready: false,
        })
    }

    /// Seed the plant and return the first observation.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Setup`] if the plant reset fails.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<Observation, EnvError> {
        self.plant.reset(seed)?;
        self.telemetry.clear();
        self.cumulative_delivered = 0.0;
        self.ready = true;
        Ok(self.observe())
    }

    /// Run one tick and return the transition.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NotReady`] before the first `reset`, or
    /// [`EnvError::Tick`] for structural tick failures.
    pub fn step(&mut self, action: &ActionInput, dt: f64) -> Result<Transition, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }

        let summary = self.plant.simulate_reaction(action, dt)?;

        // Margins follow the declared fill-level order.
        let observation = self.observe();
        let margins: Vec<f64> = observation
            .values
            .iter()
            .map(|&x| margin(x, &self.margin_config, dt))
            .collect();

        let agent_data: Vec<AgentTickData> = self
            .agents
            .iter()
            .map(|agent| AgentTickData {
                agent_id: agent.spec.agent_id,
                action_dims: agent.spec.action_dims,
                power: agent
                    .power_key
                    .and_then(|key| self.plant.slot(key))
                    .and_then(matflow_model::Slot::value)
                    .unwrap_or(0.0),
                max_power: agent.spec.max_power,
            })
            .collect();

        let demand_rate =
            ((summary.delivered - self.production.target_rate * dt) / dt).min(0.0);
        let reward = reward::compute(&self.reward_config, &agent_data, &margins, demand_rate);

        self.cumulative_delivered += summary.delivered;
        let success = self
            .production
            .batch_target
            .is_some_and(|target| self.cumulative_delivered >= target);

        self.telemetry.push(TelemetryRecord {
            t: summary.t,
            overflow_rate: summary.overflow / dt,
            power_rate: summary.power / dt,
            throughput_rate: summary.transported / dt,
            demand_gap_rate: demand_rate,
        });

        debug!(
            tick = summary.tick,
            delivered = summary.delivered,
            success,
            "env step"
        );

        Ok(Transition {
            observation,
            reward,
            success,
            broken: false,
        })
    }

    /// Assemble the current observation without ticking.
    pub fn observe(&self) -> Observation {
        assemble(&self.plant, &self.fill_keys)
    }

    /// Per-tick telemetry rows since the last reset.
    pub fn telemetry(&self) -> &[TelemetryRecord] {
        &self.telemetry
    }

    /// Cumulative delivered inventory since the last reset.
    pub const fn cumulative_delivered(&self) -> f64 {
        self.cumulative_delivered
    }

    /// Read-only access to the wrapped plant.
    pub const fn plant(&self) -> &Plant {
        &self.plant
    }

    /// Mutable access to the wrapped plant, for scenario seeding and
    /// state restoration.
    pub fn plant_mut(&mut self) -> &mut Plant {
        &mut self.plant
    }

    /// Registered agents and their action dimensionalities, in reward
    /// order (e.g. for wiring a [`StubActionSource`]).
    ///
    /// [`StubActionSource`]: crate::source::StubActionSource
    pub fn agent_roster(&self) -> Vec<(AgentId, usize)> {
        self.agents
            .iter()
            .map(|agent| (agent.spec.agent_id, agent.spec.action_dims))
            .collect()
    }

    /// Drive the env from an [`ActionSource`] for up to `ticks` ticks,
    /// stopping early on batch success.
    ///
    /// Agent values are concatenated in reward order into the ordered
    /// action vector; an agent missing from a collection contributes
    /// zeros for its dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnsupportedActionBinding`] for plants with
    /// keyed action binding, plus any `reset`/`step`/source error.
    pub fn drive(
        &mut self,
        source: &mut dyn ActionSource,
        ticks: u64,
        dt: f64,
    ) -> Result<Vec<Transition>, EnvError> {
        if !self.plant.actions_in_order() {
            return Err(EnvError::UnsupportedActionBinding);
        }

        let mut transitions = Vec::new();
        for _ in 0..ticks {
            let observation = self.observe();
            let requests = source.collect_actions(self.plant.clock().tick(), &observation)?;

            let mut values = Vec::new();
            for agent in &self.agents {
                match requests.get(&agent.spec.agent_id) {
                    Some(request) => values.extend_from_slice(&request.values),
                    None => values.extend(std::iter::repeat_n(0.0, agent.spec.action_dims)),
                }
            }

            let transition = self.step(&ActionInput::Ordered(values), dt)?;
            let done = transition.success;
            transitions.push(transition);
            if done {
                break;
            }
        }
        Ok(transitions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use matflow_core::PlantSettings;
    use matflow_model::{Component, Slot, TransferFunction};
    use matflow_types::Dimension;

    use super::*;

    fn make_plant(set_up: bool) -> Plant {
        let mut plant = Plant::new(&PlantSettings::default());
        plant
            .add_element(
                Component::new("silo")
                    .with_slot(Slot::buffer_state(
                        Dimension::real("level", 0.0, 10.0, "l").unwrap(),
                        TransferFunction::FillLevel {
                            max_vol: 10.0,
                            min_vol: 0.0,
                        },
                    ))
                    .with_slot(Slot::actuator(
                        Dimension::real("rpm", 0.0, 100.0, "rpm").unwrap(),
                    )),
            )
            .unwrap();
        if set_up {
            plant.setup(true).unwrap();
        }
        plant
    }

    fn make_agent(power_state: Option<&str>, max_power: f64) -> AgentSpec {
        AgentSpec {
            agent_id: AgentId::new(),
            name: String::from("belt"),
            action_dims: 1,
            power_state: power_state.map(str::to_owned),
            max_power,
        }
    }

    #[test]
    fn rejects_unset_up_plants() {
        let result = PlantEnv::new(
            make_plant(false),
            &SimulationConfig::default(),
            &["level"],
            vec![make_agent(None, 1.0)],
        );
        assert!(matches!(result, Err(EnvError::PlantNotSetUp)));
    }

    #[test]
    fn rejects_empty_agent_lists() {
        let result = PlantEnv::new(
            make_plant(true),
            &SimulationConfig::default(),
            &["level"],
            Vec::new(),
        );
        assert!(matches!(result, Err(EnvError::NoAgents)));
    }

    #[test]
    fn rejects_unknown_power_states() {
        let result = PlantEnv::new(
            make_plant(true),
            &SimulationConfig::default(),
            &["level"],
            vec![make_agent(Some("no_such_state"), 1.0)],
        );
        assert!(matches!(result, Err(EnvError::UnknownPowerState { .. })));
    }

    #[test]
    fn rejects_non_positive_max_power() {
        let result = PlantEnv::new(
            make_plant(true),
            &SimulationConfig::default(),
            &["level"],
            vec![make_agent(None, 0.0)],
        );
        assert!(matches!(result, Err(EnvError::NonPositiveMaxPower { .. })));
    }

    #[test]
    fn step_requires_a_reset_first() {
        let mut env = PlantEnv::new(
            make_plant(true),
            &SimulationConfig::default(),
            &["level"],
            vec![make_agent(None, 1.0)],
        )
        .unwrap();
        let result = env.step(&ActionInput::Ordered(vec![0.5]), 10.0);
        assert!(matches!(result, Err(EnvError::NotReady)));
        let _ = env.reset(Some(1)).unwrap();
        assert!(env.step(&ActionInput::Ordered(vec![0.5]), 10.0).is_ok());
    }
}
