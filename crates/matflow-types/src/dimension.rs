//! Typed, bounded scalar dimensions with unit metadata.
//!
//! A [`Dimension`] describes the value space of one plant signal: its base
//! set (real, integer, boolean), inclusive lower and upper bound, and a
//! unit string. Slots own a dimension and delegate every write to its
//! coercion rules, so out-of-range and wrong-type values are rejected in
//! exactly one place.
//!
//! # Write policies
//!
//! - **Real**: the value must be finite and within `[lower, upper]`.
//! - **Integer**: the value is rounded toward zero, then range-checked.
//! - **Boolean**: `0.0` stays `0`, any other finite value coerces to `1`
//!   (truthy). Reads always observe `0` or `1`.
//!
//! # Unbounded dimensions
//!
//! Accumulator states (overflow, energy, transported material, inventory)
//! have no physical ceiling. Their upper bound is the sentinel
//! [`Dimension::UNBOUNDED`] (`+inf`); such dimensions accept any
//! non-negative finite value and cannot be normalized.

use serde::{Deserialize, Serialize};

/// The base set a dimension draws its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSet {
    /// Real-valued quantities (levels, rates, powers).
    Real,
    /// Integer-valued quantities (counts, discrete settings).
    Integer,
    /// Boolean quantities stored as `0.0` / `1.0` (switches, threshold
    /// sensor outputs).
    Boolean,
}

/// Errors produced by dimension construction and value coercion.
#[derive(Debug, thiserror::Error)]
pub enum DimensionError {
    /// The lower bound exceeds the upper bound.
    #[error("dimension '{name}': lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds {
        /// The dimension's short name.
        name: String,
        /// The offending lower bound.
        lower: f64,
        /// The offending upper bound.
        upper: f64,
    },

    /// A bound is NaN (the only non-finite bound allowed is the
    /// [`Dimension::UNBOUNDED`] upper sentinel).
    #[error("dimension '{name}': bounds must be finite (upper may be +inf)")]
    NonFiniteBound {
        /// The dimension's short name.
        name: String,
    },

    /// A written value lies outside the dimension's bounds.
    #[error("dimension '{name}': value {value} outside [{lower}, {upper}]")]
    OutOfRange {
        /// The dimension's short name.
        name: String,
        /// The rejected value (after any rounding).
        value: f64,
        /// Inclusive lower bound.
        lower: f64,
        /// Inclusive upper bound.
        upper: f64,
    },

    /// A written value is NaN or infinite.
    #[error("dimension '{name}': value must be finite, got {value}")]
    NotFinite {
        /// The dimension's short name.
        name: String,
        /// The rejected value.
        value: f64,
    },
}

/// Immutable metadata for one scalar signal: name, base set, inclusive
/// bounds, and unit.
///
/// Construct via [`Dimension::new`] or the shorthand constructors
/// ([`real`], [`integer`], [`boolean`], [`accumulator`]); bounds are
/// validated once at construction and never change afterwards.
///
/// [`real`]: Dimension::real
/// [`integer`]: Dimension::integer
/// [`boolean`]: Dimension::boolean
/// [`accumulator`]: Dimension::accumulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Short name, unique within its owning component.
    name: String,
    /// Optional descriptive long name.
    long_name: Option<String>,
    /// The base set values are drawn from.
    base_set: BaseSet,
    /// Inclusive lower bound.
    lower: f64,
    /// Inclusive upper bound (may be [`Dimension::UNBOUNDED`]).
    upper: f64,
    /// Unit string, e.g. `"l"`, `"rpm"`, `"kW"`. Empty for unitless.
    unit: String,
}

impl Dimension {
    /// Sentinel upper bound for dimensions without a physical ceiling.
    pub const UNBOUNDED: f64 = f64::INFINITY;

    /// Create a dimension with explicit base set and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::InvalidBounds`] if `lower > upper`, or
    /// [`DimensionError::NonFiniteBound`] if a bound is NaN or the lower
    /// bound is infinite.
    pub fn new(
        name: &str,
        base_set: BaseSet,
        lower: f64,
        upper: f64,
        unit: &str,
    ) -> Result<Self, DimensionError> {
        if !lower.is_finite() || upper.is_nan() || (upper.is_infinite() && upper.is_sign_negative())
        {
            return Err(DimensionError::NonFiniteBound {
                name: name.to_owned(),
            });
        }
        if lower > upper {
            return Err(DimensionError::InvalidBounds {
                name: name.to_owned(),
                lower,
                upper,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            long_name: None,
            base_set,
            lower,
            upper,
            unit: unit.to_owned(),
        })
    }

    /// Create a real-valued dimension.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the bounds are invalid.
    pub fn real(name: &str, lower: f64, upper: f64, unit: &str) -> Result<Self, DimensionError> {
        Self::new(name, BaseSet::Real, lower, upper, unit)
    }

    /// Create an integer-valued dimension.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the bounds are invalid.
    pub fn integer(name: &str, lower: f64, upper: f64, unit: &str) -> Result<Self, DimensionError> {
        Self::new(name, BaseSet::Integer, lower, upper, unit)
    }

    /// Create a boolean dimension. Bounds are fixed to `[0, 1]`.
    pub fn boolean(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            long_name: None,
            base_set: BaseSet::Boolean,
            lower: 0.0,
            upper: 1.0,
            unit: String::new(),
        }
    }

    /// Create a non-negative, unbounded real dimension for accumulator
    /// states (overflow, energy, transported material, inventory).
    pub fn accumulator(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_owned(),
            long_name: None,
            base_set: BaseSet::Real,
            lower: 0.0,
            upper: Self::UNBOUNDED,
            unit: unit.to_owned(),
        }
    }

    /// Attach a descriptive long name (builder style).
    #[must_use]
    pub fn with_long_name(mut self, long_name: &str) -> Self {
        self.long_name = Some(long_name.to_owned());
        self
    }

    /// Rename the dimension. Used only by plant setup when resolving
    /// duplicate short names.
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Return the short name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the optional long name.
    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    /// Return the base set.
    pub const fn base_set(&self) -> BaseSet {
        self.base_set
    }

    /// Return the inclusive lower bound.
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Return the inclusive upper bound (may be [`Dimension::UNBOUNDED`]).
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Return the unit string.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Whether the dimension has a finite upper bound.
    pub fn is_bounded(&self) -> bool {
        self.upper.is_finite()
    }

    /// Width of the value range (`upper - lower`; infinite when unbounded).
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies within the dimension's bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Apply the write-side coercion policy and range check.
    ///
    /// Returns the value that should actually be stored: rounded toward
    /// zero for integer dimensions, collapsed to `0.0`/`1.0` for boolean
    /// dimensions, unchanged for real dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::NotFinite`] for NaN/infinite inputs and
    /// [`DimensionError::OutOfRange`] for values outside the bounds.
    pub fn coerce(&self, value: f64) -> Result<f64, DimensionError> {
        if !value.is_finite() {
            return Err(DimensionError::NotFinite {
                name: self.name.clone(),
                value,
            });
        }

        let coerced = match self.base_set {
            BaseSet::Real => value,
            BaseSet::Integer => value.trunc(),
            BaseSet::Boolean => {
                if value.abs() < f64::EPSILON {
                    0.0
                } else {
                    1.0
                }
            }
        };

        if self.contains(coerced) {
            Ok(coerced)
        } else {
            Err(DimensionError::OutOfRange {
                name: self.name.clone(),
                value: coerced,
                lower: self.lower,
                upper: self.upper,
            })
        }
    }

    /// Map a stored value into `[0, 1]` relative to the bounds.
    ///
    /// Returns `None` for unbounded or degenerate (zero-span) dimensions,
    /// which cannot be meaningfully normalized.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        let span = self.span();
        if !span.is_finite() || span <= 0.0 {
            return None;
        }
        Some((value - self.lower) / span)
    }

    /// Map a normalized action value `a` in `[0, 1]` into the dimension's
    /// physical range: `lower + a * (upper - lower)`.
    ///
    /// Integer dimensions round to the nearest integer after scaling;
    /// boolean dimensions threshold at `0.5`. The result is not range
    /// checked here -- the subsequent slot write applies [`coerce`].
    ///
    /// [`coerce`]: Dimension::coerce
    pub fn denormalize(&self, a: f64) -> f64 {
        match self.base_set {
            BaseSet::Boolean => {
                if a >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            BaseSet::Integer => (self.lower + a * self.span()).round(),
            BaseSet::Real => self.lower + a * self.span(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn rejects_inverted_bounds() {
        let dim = Dimension::real("level", 10.0, 0.0, "l");
        assert!(matches!(dim, Err(DimensionError::InvalidBounds { .. })));
    }

    #[test]
    fn rejects_nan_bounds() {
        let dim = Dimension::real("level", f64::NAN, 1.0, "l");
        assert!(matches!(dim, Err(DimensionError::NonFiniteBound { .. })));
    }

    #[test]
    fn accepts_unbounded_upper() {
        let dim = Dimension::real("overflow", 0.0, Dimension::UNBOUNDED, "l").unwrap();
        assert!(!dim.is_bounded());
        assert!(dim.contains(1.0e12));
    }

    #[test]
    fn accumulator_is_unbounded_real() {
        let dim = Dimension::accumulator("energy", "kWh");
        assert_eq!(dim.base_set(), BaseSet::Real);
        assert!(!dim.is_bounded());
        assert!(close(dim.lower(), 0.0));
    }

    #[test]
    fn real_coercion_checks_range() {
        let dim = Dimension::real("level", 0.0, 10.0, "l").unwrap();
        assert!(close(dim.coerce(4.2).unwrap(), 4.2));
        assert!(matches!(
            dim.coerce(10.5),
            Err(DimensionError::OutOfRange { .. })
        ));
        assert!(matches!(
            dim.coerce(f64::NAN),
            Err(DimensionError::NotFinite { .. })
        ));
    }

    #[test]
    fn integer_rounds_toward_zero() {
        let dim = Dimension::integer("count", -5.0, 5.0, "").unwrap();
        assert!(close(dim.coerce(3.9).unwrap(), 3.0));
        assert!(close(dim.coerce(-3.9).unwrap(), -3.0));
        // 5.7 truncates to 5, which is in range.
        assert!(close(dim.coerce(5.7).unwrap(), 5.0));
        // 6.2 truncates to 6, which is out of range.
        assert!(matches!(
            dim.coerce(6.2),
            Err(DimensionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn boolean_accepts_truthy_values() {
        let dim = Dimension::boolean("running");
        assert!(close(dim.coerce(0.0).unwrap(), 0.0));
        assert!(close(dim.coerce(1.0).unwrap(), 1.0));
        assert!(close(dim.coerce(0.3).unwrap(), 1.0));
        assert!(close(dim.coerce(-2.0).unwrap(), 1.0));
    }

    #[test]
    fn normalize_maps_bounds_to_unit_interval() {
        let dim = Dimension::real("level", 2.0, 12.0, "l").unwrap();
        assert!(close(dim.normalize(2.0).unwrap(), 0.0));
        assert!(close(dim.normalize(12.0).unwrap(), 1.0));
        assert!(close(dim.normalize(7.0).unwrap(), 0.5));
    }

    #[test]
    fn normalize_unbounded_is_none() {
        let dim = Dimension::accumulator("overflow", "l");
        assert!(dim.normalize(3.0).is_none());
    }

    #[test]
    fn denormalize_normalize_round_trip() {
        let dim = Dimension::real("rpm", 0.0, 100.0, "rpm").unwrap();
        for a in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let v = dim.denormalize(a);
            let back = dim.normalize(v).unwrap();
            assert!(close(a, back), "round trip failed for {a}");
        }
    }

    #[test]
    fn denormalize_integer_rounds_to_nearest() {
        let dim = Dimension::integer("setting", 0.0, 10.0, "").unwrap();
        assert!(close(dim.denormalize(0.26), 3.0));
        assert!(close(dim.denormalize(0.24), 2.0));
    }

    #[test]
    fn denormalize_boolean_thresholds_at_half() {
        let dim = Dimension::boolean("switch");
        assert!(close(dim.denormalize(0.49), 0.0));
        assert!(close(dim.denormalize(0.5), 1.0));
    }

    #[test]
    fn rename_changes_short_name_only() {
        let mut dim = Dimension::real("level", 0.0, 1.0, "l")
            .unwrap()
            .with_long_name("fill level of silo A");
        dim.rename("level_2");
        assert_eq!(dim.name(), "level_2");
        assert_eq!(dim.long_name(), Some("fill level of silo A"));
    }
}
