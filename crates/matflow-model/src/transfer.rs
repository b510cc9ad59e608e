//! The transfer-function family: pure, parameterized scalar formulas.
//!
//! Every sensor and buffer state binds exactly one [`TransferFunction`]
//! at construction. During graph evaluation the function maps a tuple of
//! provider readings (plus the tick duration) to the slot's new value.
//! Functions are stateless across ticks; everything they know is in
//! their parameters and their inputs.
//!
//! # Time handling
//!
//! `evaluate` takes an optional tick duration. With `Some(dt)` the
//! result is the integrated quantity over that interval (litres moved,
//! energy drawn); with `None` it is the instantaneous rate. Throughput
//! results are capped by the available source inventory, and every
//! physical result is non-negative.
//!
//! # Construction
//!
//! Functions are built either directly as enum values or data-driven via
//! [`TransferFunction::from_spec`], which validates the kind tag and all
//! required parameter keys. A missing or malformed parameter is a
//! construction-time error; evaluation never fails on parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors from transfer-function construction and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The kind tag is not one of the built-in family.
    #[error("unknown transfer function kind '{kind}'")]
    UnknownKind {
        /// The unrecognized tag.
        kind: String,
    },

    /// A required parameter key is absent.
    #[error("transfer function '{kind}': missing parameter '{key}'")]
    MissingParameter {
        /// The kind being constructed.
        kind: &'static str,
        /// The absent key.
        key: &'static str,
    },

    /// A parameter is present but malformed or inconsistent.
    #[error("transfer function '{kind}': bad parameter '{key}': {reason}")]
    BadParameter {
        /// The kind being constructed.
        kind: &'static str,
        /// The offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The input tuple has the wrong number of entries.
    #[error("transfer function '{kind}': expected {expected} inputs, got {got}")]
    InputArity {
        /// The kind being evaluated.
        kind: &'static str,
        /// Human-readable description of the expected arity.
        expected: &'static str,
        /// The number of inputs actually supplied.
        got: usize,
    },
}

/// A pure scalar formula with a named kind and per-kind parameters.
///
/// The serde representation is tagged by `kind` with snake_case tags
/// matching [`TransferFunction::from_spec`], so plant descriptions can
/// round-trip through JSON/YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferFunction {
    /// Boolean threshold on a level: `level >= theta`.
    ThresholdSensor {
        /// The threshold level.
        theta: f64,
    },

    /// Buffer fill level: `clamp(prev + in - sum(out), min_vol, max_vol)`.
    FillLevel {
        /// Buffer capacity.
        max_vol: f64,
        /// Buffer floor.
        min_vol: f64,
    },

    /// Per-tick overflow: `max(0, prev + in - sum(out) - max_vol)`.
    Overflow {
        /// Buffer capacity.
        max_vol: f64,
    },

    /// Accumulating inventory: `prev + in`.
    InventoryLevel,

    /// Speed-controlled belt throughput:
    /// `min(src_level, coef * rpm * dt)` while active.
    LinearBeltThroughput {
        /// Litres per revolution.
        coef: f64,
    },

    /// Speed-controlled belt energy draw, linear between the rpm
    /// endpoints: `(min_power + frac * (max_power - min_power)) * dt / 1000`
    /// while active.
    LinearBeltPower {
        /// Power draw at `min_rpm`.
        min_power: f64,
        /// Power draw at `max_rpm`.
        max_power: f64,
        /// Lower end of the speed range.
        min_rpm: f64,
        /// Upper end of the speed range.
        max_rpm: f64,
    },

    /// On/off belt throughput: `min(src_level, coef * dt)` while active.
    BinaryBeltThroughput {
        /// Litres per unit time.
        coef: f64,
    },

    /// On/off belt energy draw: `power * dt / 1000` while active.
    BinaryBeltPower {
        /// Nominal power draw.
        power: f64,
    },

    /// Timed vacuum-pump throughput with nominal amount
    /// `(2 * b + a) * min(duration, dt)`. The 3-input form caps by the
    /// source level; the 4-input form splits a shared source fairly with
    /// a sibling pump (see `evaluate`).
    TimedPumpThroughput {
        /// Pump coefficients `[a, b]`.
        coef: [f64; 2],
    },

    /// Timed vacuum-pump energy draw:
    /// `max_power * min(duration, dt) / 1000` while active.
    TimedPumpPower {
        /// Idle power draw (kept for completeness of the pump datasheet).
        min_power: f64,
        /// Running power draw.
        max_power: f64,
        /// Shortest admissible pump duration.
        min_duration: f64,
        /// Longest admissible pump duration.
        max_duration: f64,
    },

    /// Constant downstream demand: `prod_target * dt` while active.
    ConstantOfftake {
        /// Demanded volume per unit time.
        prod_target: f64,
    },

    /// Production-source silo treated as infinite supply floored at
    /// `theta_loading`: once drained to the threshold the level pins
    /// there (auto-refill) for the next tick.
    LoadingSiloLevel {
        /// Silo capacity.
        max_vol: f64,
        /// Silo floor.
        min_vol: f64,
        /// Auto-refill threshold.
        theta_loading: f64,
    },

    /// Guard state for a shared buffer drained by two parallel outflows:
    /// `max(0, min(level - other_share, share))`.
    ParallelShare,
}

/// Truthiness of a status/flag reading.
fn is_on(flag: f64) -> bool {
    flag > 0.5
}

/// Pull a required numeric parameter out of a spec dictionary.
fn require_f64(
    kind: &'static str,
    params: &Map<String, Value>,
    key: &'static str,
) -> Result<f64, TransferError> {
    let value = params
        .get(key)
        .ok_or(TransferError::MissingParameter { kind, key })?;
    value.as_f64().ok_or_else(|| TransferError::BadParameter {
        kind,
        key,
        reason: format!("expected a number, got {value}"),
    })
}

/// Pull a required two-element numeric array out of a spec dictionary.
fn require_pair(
    kind: &'static str,
    params: &Map<String, Value>,
    key: &'static str,
) -> Result<[f64; 2], TransferError> {
    let value = params
        .get(key)
        .ok_or(TransferError::MissingParameter { kind, key })?;
    let items = value.as_array().ok_or_else(|| TransferError::BadParameter {
        kind,
        key,
        reason: format!("expected a two-element array, got {value}"),
    })?;
    match items.as_slice() {
        [a, b] => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok([a, b]),
            _ => Err(TransferError::BadParameter {
                kind,
                key,
                reason: "array entries must be numbers".to_owned(),
            }),
        },
        _ => Err(TransferError::BadParameter {
            kind,
            key,
            reason: format!("expected exactly two entries, got {}", items.len()),
        }),
    }
}

impl TransferFunction {
    /// Build a transfer function from its kind tag and a parameter
    /// dictionary.
    ///
    /// All required keys for the kind must be present and well-formed;
    /// construction is the only place parameters are validated, so a
    /// successful construction can never fail on parameters at runtime.
    ///
    /// # Errors
    ///
    /// [`TransferError::UnknownKind`] for an unrecognized tag,
    /// [`TransferError::MissingParameter`] / [`TransferError::BadParameter`]
    /// for dictionary problems.
    pub fn from_spec(kind: &str, params: &Map<String, Value>) -> Result<Self, TransferError> {
        match kind {
            "threshold_sensor" => Ok(Self::ThresholdSensor {
                theta: require_f64("threshold_sensor", params, "theta")?,
            }),
            "fill_level" => {
                let max_vol = require_f64("fill_level", params, "max_vol")?;
                let min_vol = require_f64("fill_level", params, "min_vol")?;
                if min_vol > max_vol {
                    return Err(TransferError::BadParameter {
                        kind: "fill_level",
                        key: "min_vol",
                        reason: format!("min_vol {min_vol} exceeds max_vol {max_vol}"),
                    });
                }
                Ok(Self::FillLevel { max_vol, min_vol })
            }
            "overflow" => Ok(Self::Overflow {
                max_vol: require_f64("overflow", params, "max_vol")?,
            }),
            "inventory_level" => Ok(Self::InventoryLevel),
            "linear_belt_throughput" => Ok(Self::LinearBeltThroughput {
                coef: require_f64("linear_belt_throughput", params, "coef")?,
            }),
            "linear_belt_power" => {
                let min_power = require_f64("linear_belt_power", params, "min_power")?;
                let max_power = require_f64("linear_belt_power", params, "max_power")?;
                let min_rpm = require_f64("linear_belt_power", params, "min_rpm")?;
                let max_rpm = require_f64("linear_belt_power", params, "max_rpm")?;
                if min_rpm >= max_rpm {
                    return Err(TransferError::BadParameter {
                        kind: "linear_belt_power",
                        key: "min_rpm",
                        reason: format!("min_rpm {min_rpm} must be below max_rpm {max_rpm}"),
                    });
                }
                Ok(Self::LinearBeltPower {
                    min_power,
                    max_power,
                    min_rpm,
                    max_rpm,
                })
            }
            "binary_belt_throughput" => Ok(Self::BinaryBeltThroughput {
                coef: require_f64("binary_belt_throughput", params, "coef")?,
            }),
            "binary_belt_power" => Ok(Self::BinaryBeltPower {
                power: require_f64("binary_belt_power", params, "power")?,
            }),
            "timed_pump_throughput" => Ok(Self::TimedPumpThroughput {
                coef: require_pair("timed_pump_throughput", params, "coef")?,
            }),
            "timed_pump_power" => Ok(Self::TimedPumpPower {
                min_power: require_f64("timed_pump_power", params, "min_power")?,
                max_power: require_f64("timed_pump_power", params, "max_power")?,
                min_duration: require_f64("timed_pump_power", params, "min_duration")?,
                max_duration: require_f64("timed_pump_power", params, "max_duration")?,
            }),
            "constant_offtake" => Ok(Self::ConstantOfftake {
                prod_target: require_f64("constant_offtake", params, "prod_target")?,
            }),
            "loading_silo_level" => {
                let max_vol = require_f64("loading_silo_level", params, "max_vol")?;
                let min_vol = require_f64("loading_silo_level", params, "min_vol")?;
                let theta_loading = require_f64("loading_silo_level", params, "theta_loading")?;
                if theta_loading < min_vol || theta_loading > max_vol {
                    return Err(TransferError::BadParameter {
                        kind: "loading_silo_level",
                        key: "theta_loading",
                        reason: format!(
                            "theta_loading {theta_loading} outside [{min_vol}, {max_vol}]"
                        ),
                    });
                }
                Ok(Self::LoadingSiloLevel {
                    max_vol,
                    min_vol,
                    theta_loading,
                })
            }
            "parallel_share" => Ok(Self::ParallelShare),
            other => Err(TransferError::UnknownKind {
                kind: other.to_owned(),
            }),
        }
    }

    /// Return the kind tag (matching the `from_spec` vocabulary).
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ThresholdSensor { .. } => "threshold_sensor",
            Self::FillLevel { .. } => "fill_level",
            Self::Overflow { .. } => "overflow",
            Self::InventoryLevel => "inventory_level",
            Self::LinearBeltThroughput { .. } => "linear_belt_throughput",
            Self::LinearBeltPower { .. } => "linear_belt_power",
            Self::BinaryBeltThroughput { .. } => "binary_belt_throughput",
            Self::BinaryBeltPower { .. } => "binary_belt_power",
            Self::TimedPumpThroughput { .. } => "timed_pump_throughput",
            Self::TimedPumpPower { .. } => "timed_pump_power",
            Self::ConstantOfftake { .. } => "constant_offtake",
            Self::LoadingSiloLevel { .. } => "loading_silo_level",
            Self::ParallelShare => "parallel_share",
        }
    }

    /// Expected input arity as `(min, max)`; `max = None` means the kind
    /// accepts any number of trailing outflow inputs.
    pub const fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Self::ThresholdSensor { .. } | Self::BinaryBeltPower { .. } | Self::ConstantOfftake { .. } => {
                (1, Some(1))
            }
            Self::InventoryLevel
            | Self::LinearBeltPower { .. }
            | Self::BinaryBeltThroughput { .. }
            | Self::TimedPumpPower { .. } => (2, Some(2)),
            Self::FillLevel { .. } | Self::Overflow { .. } => (2, None),
            Self::LinearBeltThroughput { .. } => (3, Some(3)),
            Self::TimedPumpThroughput { .. } => (3, Some(4)),
            Self::LoadingSiloLevel { .. } => (1, None),
            Self::ParallelShare => (3, Some(3)),
        }
    }

    /// Whether `count` provider inputs satisfy this kind's arity.
    pub const fn accepts_arity(&self, count: usize) -> bool {
        let (min, max) = self.arity();
        if count < min {
            return false;
        }
        match max {
            Some(max) => count <= max,
            None => true,
        }
    }

    /// Evaluate the formula on a tuple of provider readings.
    ///
    /// `dt = Some(..)` yields the integrated quantity over the tick,
    /// `dt = None` the instantaneous rate. Inputs are positional; see
    /// each variant's documentation for the expected tuple.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InputArity`] if the input count does not
    /// match the kind. This is a wiring bug; the signal graph validates
    /// arity at registration, so a well-formed plant never sees it.
    #[allow(clippy::too_many_lines)]
    pub fn evaluate(&self, inputs: &[f64], dt: Option<f64>) -> Result<f64, TransferError> {
        match self {
            Self::ThresholdSensor { theta } => match inputs {
                [level] => Ok(if *level >= *theta { 1.0 } else { 0.0 }),
                _ => Err(self.arity_error("(level)", inputs.len())),
            },

            Self::FillLevel { max_vol, min_vol } => match inputs {
                [prev, inflow, outflows @ ..] => {
                    let out: f64 = outflows.iter().sum();
                    Ok((prev + inflow - out).clamp(*min_vol, *max_vol))
                }
                _ => Err(self.arity_error("(prev, in, out...)", inputs.len())),
            },

            Self::Overflow { max_vol } => match inputs {
                [prev, inflow, outflows @ ..] => {
                    let out: f64 = outflows.iter().sum();
                    Ok((prev + inflow - out - max_vol).max(0.0))
                }
                _ => Err(self.arity_error("(prev, in, out...)", inputs.len())),
            },

            Self::InventoryLevel => match inputs {
                [prev, inflow] => Ok(prev + inflow),
                _ => Err(self.arity_error("(prev, in)", inputs.len())),
            },

            Self::LinearBeltThroughput { coef } => match inputs {
                [rpm, active, src_level] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    let rate = coef * rpm;
                    match dt {
                        Some(dt) => Ok((rate * dt).min(*src_level).max(0.0)),
                        None => Ok(rate.max(0.0)),
                    }
                }
                _ => Err(self.arity_error("(rpm, active, src_level)", inputs.len())),
            },

            Self::LinearBeltPower {
                min_power,
                max_power,
                min_rpm,
                max_rpm,
            } => match inputs {
                [rpm, active] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    let frac = ((rpm - min_rpm) / (max_rpm - min_rpm)).clamp(0.0, 1.0);
                    let power = min_power + frac * (max_power - min_power);
                    Ok((power * dt.unwrap_or(1.0) / 1000.0).max(0.0))
                }
                _ => Err(self.arity_error("(rpm, active)", inputs.len())),
            },

            Self::BinaryBeltThroughput { coef } => match inputs {
                [active, src_level] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    match dt {
                        Some(dt) => Ok((coef * dt).min(*src_level).max(0.0)),
                        None => Ok(coef.max(0.0)),
                    }
                }
                _ => Err(self.arity_error("(active, src_level)", inputs.len())),
            },

            Self::BinaryBeltPower { power } => match inputs {
                [active] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    Ok((power * dt.unwrap_or(1.0) / 1000.0).max(0.0))
                }
                _ => Err(self.arity_error("(active)", inputs.len())),
            },

            Self::TimedPumpThroughput { coef: [a, b] } => match inputs {
                [duration, active, src_level, rest @ ..] if rest.len() <= 1 => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    let Some(dt) = dt else {
                        // Instantaneous rate: the nominal pump coefficient.
                        return Ok((2.0 * b + a).max(0.0));
                    };
                    let nominal = ((2.0 * b + a) * duration.min(dt)).max(0.0);
                    let available = src_level.max(0.0);
                    match rest {
                        [] => Ok(nominal.min(available)),
                        [other_duration] => {
                            // Fair split against the sibling pump on the same
                            // source. A deactivated sibling reads 0 and this
                            // degenerates to the 3-input form.
                            let other = ((2.0 * b + a) * other_duration.min(dt)).max(0.0);
                            let total = nominal + other;
                            if total <= available || total <= 0.0 {
                                Ok(nominal)
                            } else {
                                Ok((available * nominal / total).min(nominal))
                            }
                        }
                        _ => Err(self.arity_error(
                            "(duration, active, src_level[, other_duration])",
                            inputs.len(),
                        )),
                    }
                }
                _ => Err(self.arity_error(
                    "(duration, active, src_level[, other_duration])",
                    inputs.len(),
                )),
            },

            Self::TimedPumpPower {
                min_power: _,
                max_power,
                min_duration,
                max_duration,
            } => match inputs {
                [duration, active] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    let run = duration.clamp(*min_duration, *max_duration);
                    let run = match dt {
                        Some(dt) => run.min(dt),
                        None => run,
                    };
                    Ok((max_power * run / 1000.0).max(0.0))
                }
                _ => Err(self.arity_error("(duration, active)", inputs.len())),
            },

            Self::ConstantOfftake { prod_target } => match inputs {
                [active] => {
                    if !is_on(*active) {
                        return Ok(0.0);
                    }
                    Ok((prod_target * dt.unwrap_or(1.0)).max(0.0))
                }
                _ => Err(self.arity_error("(active)", inputs.len())),
            },

            Self::LoadingSiloLevel {
                max_vol,
                min_vol,
                theta_loading,
            } => match inputs {
                [prev, outflows @ ..] => {
                    let out: f64 = outflows.iter().sum();
                    // The upstream supply is treated as infinite: drained
                    // below theta_loading, the level pins at the threshold.
                    Ok((prev - out).max(*theta_loading).clamp(*min_vol, *max_vol))
                }
                _ => Err(self.arity_error("(prev, out...)", inputs.len())),
            },

            Self::ParallelShare => match inputs {
                [level, share, other_share] => Ok((level - other_share).min(*share).max(0.0)),
                _ => Err(self.arity_error("(level, share, other_share)", inputs.len())),
            },
        }
    }

    /// Build an [`TransferError::InputArity`] for this kind.
    const fn arity_error(&self, expected: &'static str, got: usize) -> TransferError {
        TransferError::InputArity {
            kind: self.kind(),
            expected,
            got,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn from_spec_builds_every_kind() {
        let cases: Vec<(&str, Map<String, Value>)> = vec![
            ("threshold_sensor", params(&[("theta", json!(4.5))])),
            (
                "fill_level",
                params(&[("max_vol", json!(10.0)), ("min_vol", json!(0.0))]),
            ),
            ("overflow", params(&[("max_vol", json!(10.0))])),
            ("inventory_level", Map::new()),
            ("linear_belt_throughput", params(&[("coef", json!(0.1))])),
            (
                "linear_belt_power",
                params(&[
                    ("min_power", json!(10.0)),
                    ("max_power", json!(50.0)),
                    ("min_rpm", json!(0.0)),
                    ("max_rpm", json!(100.0)),
                ]),
            ),
            ("binary_belt_throughput", params(&[("coef", json!(0.5))])),
            ("binary_belt_power", params(&[("power", json!(30.0))])),
            (
                "timed_pump_throughput",
                params(&[("coef", json!([0.05, 0.1]))]),
            ),
            (
                "timed_pump_power",
                params(&[
                    ("min_power", json!(5.0)),
                    ("max_power", json!(80.0)),
                    ("min_duration", json!(0.0)),
                    ("max_duration", json!(10.0)),
                ]),
            ),
            ("constant_offtake", params(&[("prod_target", json!(0.2))])),
            (
                "loading_silo_level",
                params(&[
                    ("max_vol", json!(20.0)),
                    ("min_vol", json!(0.0)),
                    ("theta_loading", json!(2.0)),
                ]),
            ),
            ("parallel_share", Map::new()),
        ];

        for (kind, p) in cases {
            let built = TransferFunction::from_spec(kind, &p);
            assert!(built.is_ok(), "failed to build {kind}");
            assert_eq!(built.unwrap().kind(), kind);
        }
    }

    #[test]
    fn from_spec_rejects_unknown_kind() {
        let built = TransferFunction::from_spec("warp_drive", &Map::new());
        assert!(matches!(built, Err(TransferError::UnknownKind { .. })));
    }

    #[test]
    fn from_spec_rejects_missing_parameter() {
        let built = TransferFunction::from_spec("threshold_sensor", &Map::new());
        assert!(matches!(
            built,
            Err(TransferError::MissingParameter {
                kind: "threshold_sensor",
                key: "theta",
            })
        ));
    }

    #[test]
    fn from_spec_rejects_inverted_fill_bounds() {
        let p = params(&[("max_vol", json!(1.0)), ("min_vol", json!(5.0))]);
        let built = TransferFunction::from_spec("fill_level", &p);
        assert!(matches!(built, Err(TransferError::BadParameter { .. })));
    }

    #[test]
    fn from_spec_rejects_malformed_coef_pair() {
        let p = params(&[("coef", json!(0.1))]);
        let built = TransferFunction::from_spec("timed_pump_throughput", &p);
        assert!(matches!(built, Err(TransferError::BadParameter { .. })));
    }

    #[test]
    fn threshold_sensor_fires_at_theta() {
        let f = TransferFunction::ThresholdSensor { theta: 4.5 };
        assert!(close(f.evaluate(&[4.4], Some(10.0)).unwrap(), 0.0));
        assert!(close(f.evaluate(&[4.5], Some(10.0)).unwrap(), 1.0));
        assert!(close(f.evaluate(&[9.0], Some(10.0)).unwrap(), 1.0));
    }

    #[test]
    fn fill_level_clamps_to_capacity() {
        let f = TransferFunction::FillLevel {
            max_vol: 5.0,
            min_vol: 0.0,
        };
        // prev 0, in 8, no outflow: clamped at capacity.
        assert!(close(f.evaluate(&[0.0, 8.0], Some(10.0)).unwrap(), 5.0));
    }

    #[test]
    fn fill_level_sums_multiple_outflows() {
        let f = TransferFunction::FillLevel {
            max_vol: 10.0,
            min_vol: 0.0,
        };
        let level = f.evaluate(&[6.0, 1.0, 2.0, 3.0], Some(10.0)).unwrap();
        assert!(close(level, 2.0));
    }

    #[test]
    fn fill_level_floors_at_min_vol() {
        let f = TransferFunction::FillLevel {
            max_vol: 10.0,
            min_vol: 1.0,
        };
        // prev 2, out 5: the floor absorbs the deficit.
        assert!(close(f.evaluate(&[2.0, 0.0, 5.0], Some(10.0)).unwrap(), 1.0));
    }

    #[test]
    fn overflow_reports_excess_only() {
        let f = TransferFunction::Overflow { max_vol: 5.0 };
        assert!(close(f.evaluate(&[4.5, 10.0], Some(10.0)).unwrap(), 9.5));
        assert!(close(f.evaluate(&[1.0, 2.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn inventory_accumulates() {
        let f = TransferFunction::InventoryLevel;
        assert!(close(f.evaluate(&[7.0, 2.0], Some(10.0)).unwrap(), 9.0));
    }

    #[test]
    fn linear_belt_caps_by_source() {
        let f = TransferFunction::LinearBeltThroughput { coef: 0.1 };
        // coef * rpm * dt = 0.1 * 100 * 10 = 100, but only 8 available.
        let moved = f.evaluate(&[100.0, 1.0, 8.0], Some(10.0)).unwrap();
        assert!(close(moved, 8.0));
    }

    #[test]
    fn linear_belt_inactive_moves_nothing() {
        let f = TransferFunction::LinearBeltThroughput { coef: 0.1 };
        assert!(close(f.evaluate(&[100.0, 0.0, 8.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn linear_belt_rate_without_dt() {
        let f = TransferFunction::LinearBeltThroughput { coef: 0.1 };
        assert!(close(f.evaluate(&[50.0, 1.0, 8.0], None).unwrap(), 5.0));
    }

    #[test]
    fn linear_belt_power_interpolates() {
        let f = TransferFunction::LinearBeltPower {
            min_power: 10.0,
            max_power: 50.0,
            min_rpm: 0.0,
            max_rpm: 100.0,
        };
        // At half speed: 30 kW over 10 s -> 0.3.
        assert!(close(f.evaluate(&[50.0, 1.0], Some(10.0)).unwrap(), 0.3));
        assert!(close(f.evaluate(&[50.0, 0.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn binary_belt_throughput_and_power() {
        let t = TransferFunction::BinaryBeltThroughput { coef: 0.5 };
        assert!(close(t.evaluate(&[1.0, 100.0], Some(10.0)).unwrap(), 5.0));
        assert!(close(t.evaluate(&[1.0, 2.0], Some(10.0)).unwrap(), 2.0));

        let p = TransferFunction::BinaryBeltPower { power: 30.0 };
        assert!(close(p.evaluate(&[1.0], Some(10.0)).unwrap(), 0.3));
        assert!(close(p.evaluate(&[0.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn timed_pump_three_inputs_caps_by_source() {
        let f = TransferFunction::TimedPumpThroughput { coef: [0.05, 0.1] };
        // nominal = (2*0.1 + 0.05) * min(8, 10) = 0.25 * 8 = 2.
        assert!(close(f.evaluate(&[8.0, 1.0, 10.0], Some(10.0)).unwrap(), 2.0));
        assert!(close(f.evaluate(&[8.0, 1.0, 0.5], Some(10.0)).unwrap(), 0.5));
    }

    #[test]
    fn timed_pump_fair_split_shares_scarce_source() {
        let f = TransferFunction::TimedPumpThroughput { coef: [0.05, 0.1] };
        // Both pumps nominal 2, source holds 3: each gets 1.5.
        let drawn = f.evaluate(&[8.0, 1.0, 3.0, 8.0], Some(10.0)).unwrap();
        assert!(close(drawn, 1.5));
    }

    #[test]
    fn timed_pump_fair_split_tie_break_at_half() {
        let f = TransferFunction::TimedPumpThroughput { coef: [0.05, 0.1] };
        // Source exactly covers both nominals: each gets its own share.
        let drawn = f.evaluate(&[8.0, 1.0, 4.0, 8.0], Some(10.0)).unwrap();
        assert!(close(drawn, 2.0));
    }

    #[test]
    fn timed_pump_split_with_idle_sibling() {
        let f = TransferFunction::TimedPumpThroughput { coef: [0.05, 0.1] };
        // A deactivated sibling reads 0: behaves like the 3-input form.
        let drawn = f.evaluate(&[8.0, 1.0, 3.0, 0.0], Some(10.0)).unwrap();
        assert!(close(drawn, 2.0));
    }

    #[test]
    fn timed_pump_duration_capped_by_dt() {
        let f = TransferFunction::TimedPumpThroughput { coef: [0.05, 0.1] };
        // duration 20 capped to dt 10: nominal = 0.25 * 10 = 2.5.
        assert!(close(
            f.evaluate(&[20.0, 1.0, 100.0], Some(10.0)).unwrap(),
            2.5
        ));
    }

    #[test]
    fn timed_pump_power_runs_at_max() {
        let f = TransferFunction::TimedPumpPower {
            min_power: 5.0,
            max_power: 80.0,
            min_duration: 0.0,
            max_duration: 10.0,
        };
        // 80 kW for min(8, 10) s -> 0.64.
        assert!(close(f.evaluate(&[8.0, 1.0], Some(10.0)).unwrap(), 0.64));
        assert!(close(f.evaluate(&[8.0, 0.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn constant_offtake_draws_target() {
        let f = TransferFunction::ConstantOfftake { prod_target: 0.2 };
        assert!(close(f.evaluate(&[1.0], Some(10.0)).unwrap(), 2.0));
        assert!(close(f.evaluate(&[0.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn loading_silo_floors_at_threshold() {
        let f = TransferFunction::LoadingSiloLevel {
            max_vol: 20.0,
            min_vol: 0.0,
            theta_loading: 2.0,
        };
        // Drained below the threshold: pinned at theta_loading.
        assert!(close(f.evaluate(&[3.0, 5.0], Some(10.0)).unwrap(), 2.0));
        // Above the threshold: plain drain.
        assert!(close(f.evaluate(&[10.0, 5.0], Some(10.0)).unwrap(), 5.0));
    }

    #[test]
    fn loading_silo_zero_threshold_drains_dry() {
        let f = TransferFunction::LoadingSiloLevel {
            max_vol: 10.0,
            min_vol: 0.0,
            theta_loading: 0.0,
        };
        assert!(close(f.evaluate(&[8.0, 8.0], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn parallel_share_limits_second_draw() {
        let f = TransferFunction::ParallelShare;
        // level 3, own share 2, sibling already granted 2: only 1 left.
        assert!(close(f.evaluate(&[3.0, 2.0, 2.0], Some(10.0)).unwrap(), 1.0));
        // Nothing left: floor at zero.
        assert!(close(f.evaluate(&[3.0, 2.0, 3.5], Some(10.0)).unwrap(), 0.0));
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let f = TransferFunction::ThresholdSensor { theta: 1.0 };
        let result = f.evaluate(&[1.0, 2.0], Some(10.0));
        assert!(matches!(result, Err(TransferError::InputArity { .. })));
    }

    #[test]
    fn accepts_arity_respects_variadic_kinds() {
        let fill = TransferFunction::FillLevel {
            max_vol: 1.0,
            min_vol: 0.0,
        };
        assert!(!fill.accepts_arity(1));
        assert!(fill.accepts_arity(2));
        assert!(fill.accepts_arity(4));

        let pump = TransferFunction::TimedPumpThroughput { coef: [0.0, 0.1] };
        assert!(pump.accepts_arity(3));
        assert!(pump.accepts_arity(4));
        assert!(!pump.accepts_arity(5));
    }

    #[test]
    fn serde_roundtrip_keeps_kind_tags() {
        let f = TransferFunction::LinearBeltThroughput { coef: 0.1 };
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json.get("kind").and_then(Value::as_str), Some("linear_belt_throughput"));
        let back: TransferFunction = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }
}
