//! Piecewise-linear margin penalty on normalized fill levels.
//!
//! The margin measures how far a buffer has strayed from its operating
//! band. Inside the band `[low, high]` there is no penalty; below `low`
//! and above `high` the penalty grows linearly, scaled so that the full
//! distance to the nearest bound (empty or full buffer) is worth
//! `slope`, then integrated over the tick duration.
//!
//! Margins feed the reward computation: a well-operated buffer carries
//! zero margin and maximal reward contribution.

use matflow_core::MarginConfig;

/// Margin penalty for a normalized fill level `x` in `[0, 1]` against
/// the band, integrated over `dt`.
///
/// - `x < low`: `(-slope / low) * (x - low) * dt`
/// - `x > high`: `(slope / (1 - high)) * (x - high) * dt`
/// - inside the band: `0`
///
/// The result is non-negative for `x` in `[0, 1]` and any positive
/// band configuration.
pub fn margin(x: f64, band: &MarginConfig, dt: f64) -> f64 {
    if x < band.low {
        (-band.slope / band.low) * (x - band.low) * dt
    } else if x > band.high {
        (band.slope / (1.0 - band.high)) * (x - band.high) * dt
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> MarginConfig {
        MarginConfig {
            low: 0.2,
            high: 0.8,
            slope: 1.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn inside_band_is_free() {
        let band = band();
        assert!(close(margin(0.2, &band, 10.0), 0.0));
        assert!(close(margin(0.5, &band, 10.0), 0.0));
        assert!(close(margin(0.8, &band, 10.0), 0.0));
    }

    #[test]
    fn below_band_penalizes_linearly() {
        let band = band();
        // Empty buffer: full low-side penalty, slope * dt.
        assert!(close(margin(0.0, &band, 10.0), 10.0));
        // Halfway to the band edge: half the penalty.
        assert!(close(margin(0.1, &band, 10.0), 5.0));
    }

    #[test]
    fn above_band_penalizes_linearly() {
        let band = band();
        // Full buffer: full high-side penalty, slope * dt.
        assert!(close(margin(1.0, &band, 10.0), 10.0));
        assert!(close(margin(0.9, &band, 10.0), 5.0));
    }

    #[test]
    fn penalty_scales_with_dt() {
        let band = band();
        assert!(close(margin(0.0, &band, 1.0), 1.0));
        assert!(close(margin(0.0, &band, 20.0), 20.0));
    }

    #[test]
    fn penalty_is_non_negative_across_the_range() {
        let band = band();
        for step in 0..=20 {
            let x = f64::from(step) / 20.0;
            assert!(margin(x, &band, 10.0) >= 0.0, "negative margin at {x}");
        }
    }

    #[test]
    fn asymmetric_band_uses_both_slopes() {
        let band = MarginConfig {
            low: 0.5,
            high: 0.9,
            slope: 2.0,
        };
        // Below: slope/low = 4 per unit; at x = 0.25, 4 * 0.25 = 1 per dt.
        assert!(close(margin(0.25, &band, 1.0), 1.0));
        // Above: slope/(1-high) = 20 per unit; at x = 0.95, 20 * 0.05 = 1.
        assert!(close(margin(0.95, &band, 1.0), 1.0));
    }
}
