//! Simulation clock: tick counter and simulated time.
//!
//! The clock is the single source of truth for temporal state in a
//! plant. It counts ticks and accumulates simulated seconds; the tick
//! duration is supplied per tick, so a plant can be driven at varying
//! resolution. Simulated time has no coupling to wall-clock time.
//!
//! # Design Principles
//!
//! - The tick counter uses checked arithmetic (no silent overflow).
//! - Tick durations are validated once, before any state mutates.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The supplied tick duration is not a positive finite number.
    #[error("invalid tick duration: {dt}")]
    InvalidDuration {
        /// The rejected duration.
        dt: f64,
    },
}

/// Tick counter and simulated-time accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Completed ticks since the last reset.
    tick: u64,
    /// Simulated seconds since the last reset.
    t: f64,
}

impl SimClock {
    /// Create a clock at tick 0, `t = 0`.
    pub const fn new() -> Self {
        Self { tick: 0, t: 0.0 }
    }

    /// Validate a tick duration without touching the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDuration`] unless `dt` is a positive
    /// finite number.
    pub fn validate(dt: f64) -> Result<(), ClockError> {
        if dt.is_finite() && dt > 0.0 {
            Ok(())
        } else {
            Err(ClockError::InvalidDuration { dt })
        }
    }

    /// Advance by one tick of duration `dt`. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDuration`] for a non-positive or
    /// non-finite `dt`, [`ClockError::TickOverflow`] if the counter
    /// would exceed `u64::MAX`.
    pub fn advance(&mut self, dt: f64) -> Result<u64, ClockError> {
        Self::validate(dt)?;
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.t += dt;
        Ok(self.tick)
    }

    /// Return to tick 0, `t = 0`.
    pub const fn reset(&mut self) {
        self.tick = 0;
        self.t = 0.0;
    }

    /// Completed ticks since the last reset.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the last reset.
    pub const fn t(&self) -> f64 {
        self.t
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_ticks_and_time() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(10.0).unwrap(), 1);
        assert_eq!(clock.advance(5.0).unwrap(), 2);
        assert_eq!(clock.tick(), 2);
        assert!((clock.t() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_duration() {
        let mut clock = SimClock::new();
        assert!(matches!(
            clock.advance(0.0),
            Err(ClockError::InvalidDuration { .. })
        ));
        assert!(matches!(
            clock.advance(-1.0),
            Err(ClockError::InvalidDuration { .. })
        ));
        assert!(matches!(
            clock.advance(f64::NAN),
            Err(ClockError::InvalidDuration { .. })
        ));
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut clock = SimClock::new();
        let _ = clock.advance(10.0);
        clock.reset();
        assert_eq!(clock.tick(), 0);
        assert!(clock.t().abs() < 1e-12);
    }
}
