//! Observation and telemetry types delivered to external consumers.
//!
//! The observation is the agent-facing view of plant state: one value in
//! `[0, 1]` per buffer in the adaptor's declared fill-level list, in
//! declared order. Telemetry is the per-tick accounting row emitted for
//! external monitoring; all its quantities are rates normalized by the
//! tick duration.

use serde::{Deserialize, Serialize};

/// Normalized plant state as seen by agents after a tick (or a reset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The tick this observation was assembled at (0 after a reset).
    pub tick: u64,
    /// Normalized fill levels in `[0, 1]`, in the adaptor's declared
    /// buffer order. Fixed dimension for the lifetime of the plant.
    pub values: Vec<f64>,
}

impl Observation {
    /// Number of observed buffers (the observation dimension).
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

/// One per-tick telemetry row, all quantities normalized by the tick
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Simulated time at the end of the tick.
    pub t: f64,
    /// Overflow volume lost per unit time.
    pub overflow_rate: f64,
    /// Energy drawn per unit time.
    pub power_rate: f64,
    /// Material transported per unit time.
    pub throughput_rate: f64,
    /// Shortfall against the demand target per unit time (zero or
    /// negative; negative when under target).
    pub demand_gap_rate: f64,
}
