//! Error types for the `matflow-env` crate.
//!
//! All fallible adaptor operations return [`EnvError`] through the
//! standard [`Result`] type alias. Construction problems (unknown or
//! unobservable states, missing agents) are fatal at env creation;
//! during stepping only structural tick errors propagate.

use matflow_core::{SetupError, TickError};

use crate::source::SourceError;

/// Errors that can occur in the plant-to-agent adaptor.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The wrapped plant has not completed setup.
    #[error("plant must be set up before wrapping it in an env")]
    PlantNotSetUp,

    /// A declared fill-level state does not exist.
    #[error("unknown buffer state '{name}'")]
    UnknownState {
        /// The unresolved name.
        name: String,
    },

    /// A declared fill-level state cannot be normalized (not a bounded
    /// buffer state).
    #[error("state '{name}' is not a bounded buffer state")]
    NotObservable {
        /// The rejected name.
        name: String,
    },

    /// An agent binding references a missing power state.
    #[error("agent '{agent}': unknown power state '{name}'")]
    UnknownPowerState {
        /// The agent whose binding is broken.
        agent: String,
        /// The unresolved state name.
        name: String,
    },

    /// An agent binding carries a non-positive power normalization
    /// reference.
    #[error("agent '{agent}': max_power must be positive, got {max_power}")]
    NonPositiveMaxPower {
        /// The agent whose binding is broken.
        agent: String,
        /// The rejected value.
        max_power: f64,
    },

    /// The adaptor needs at least one agent binding.
    #[error("at least one agent binding is required")]
    NoAgents,

    /// `step` was called before the first `reset`.
    #[error("env is not ready; call reset first")]
    NotReady,

    /// The driver helper only supports positionally-bound plants.
    #[error("plant binds actions by key; the ordered driver cannot serve it")]
    UnsupportedActionBinding,

    /// A plant setup operation failed.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: SetupError,
    },

    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// The action source failed.
    #[error("action source error: {source}")]
    Source {
        /// The underlying source error.
        #[from]
        source: SourceError,
    },
}
