//! Plant-to-agent adaptor for the Matflow simulation.
//!
//! This crate turns a set-up plant into the environment interface
//! learning agents expect (reinforcement, game-theoretic, evolutionary,
//! supervised): normalized observations per buffer, multi-agent rewards
//! from margin/power/demand contributions, a per-tick telemetry stream,
//! and an action-source seam for driving episodes.
//!
//! # Modules
//!
//! - [`env`] -- [`PlantEnv`]: reset/step lifecycle, episode flags,
//!   telemetry, the episode driver.
//! - [`error`] -- Error types for adaptor construction and stepping.
//! - [`margin`] -- Piecewise-linear out-of-band penalty on normalized
//!   fill levels.
//! - [`observation`] -- Fill-level resolution and observation assembly.
//! - [`reward`] -- Per-agent reward contributions and flavor packaging.
//! - [`source`] -- [`ActionSource`] trait and [`StubActionSource`].
//!
//! [`PlantEnv`]: env::PlantEnv
//! [`ActionSource`]: source::ActionSource
//! [`StubActionSource`]: source::StubActionSource

pub mod env;
pub mod error;
pub mod margin;
pub mod observation;
pub mod reward;
pub mod source;

// Re-export primary types at crate root.
pub use env::{AgentSpec, PlantEnv, Transition};
pub use error::EnvError;
pub use margin::margin;
pub use reward::AgentTickData;
pub use source::{ActionSource, SourceError, StubActionSource};
