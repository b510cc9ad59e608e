//! Action source trait and stub implementation.
//!
//! Each tick the adaptor presents the current [`Observation`] to an
//! [`ActionSource`] and collects one [`ActionRequest`] per agent. The
//! trait abstracts the mechanism by which actions are obtained -- a
//! reinforcement-learning policy, a game-theoretic solver, a scripted
//! controller, or a test stub.
//!
//! [`StubActionSource`] returns a constant action for every agent,
//! which lets the tick loop be exercised end-to-end before any learner
//! is attached.

use std::collections::BTreeMap;

use chrono::Utc;
use matflow_types::{ActionRequest, AgentId, Observation};

/// Errors that can occur while collecting actions.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// An agent did not respond within its deadline.
    #[error("agent {agent_id} timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The agent that timed out.
        agent_id: AgentId,
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// An internal error in the action source.
    #[error("action source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of agent actions.
///
/// Implementations produce an [`ActionRequest`] per agent when given
/// the current observation. The adaptor calls [`collect_actions`] once
/// per tick.
///
/// [`collect_actions`]: ActionSource::collect_actions
pub trait ActionSource {
    /// Collect actions from all agents for the given tick.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the collection fails entirely;
    /// individual agent failures should be mapped to a safe default
    /// action instead.
    fn collect_actions(
        &mut self,
        tick: u64,
        observation: &Observation,
    ) -> Result<BTreeMap<AgentId, ActionRequest>, SourceError>;
}

/// A stub action source returning a constant value for every action
/// dimension of every registered agent.
#[derive(Debug, Clone)]
pub struct StubActionSource {
    /// The constant normalized action value.
    value: f64,
    /// Registered agents and their action dimensionalities.
    agents: Vec<(AgentId, usize)>,
}

impl StubActionSource {
    /// Create a stub emitting `value` for the given agents.
    pub fn new(value: f64, agents: Vec<(AgentId, usize)>) -> Self {
        Self { value, agents }
    }
}

impl ActionSource for StubActionSource {
    fn collect_actions(
        &mut self,
        _tick: u64,
        _observation: &Observation,
    ) -> Result<BTreeMap<AgentId, ActionRequest>, SourceError> {
        Ok(self
            .agents
            .iter()
            .map(|&(agent_id, dims)| {
                (
                    agent_id,
                    ActionRequest {
                        agent_id,
                        values: vec![self.value; dims],
                        submitted_at: Utc::now(),
                    },
                )
            })
            .collect())
    }
}
