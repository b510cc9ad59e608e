//! Configuration loading and typed config structures for Matflow plants.
//!
//! The canonical configuration is a YAML document with one section per
//! concern: plant settings, margin band, reward coefficients, and
//! production targets. This module defines strongly-typed structs that
//! mirror the YAML structure and provides a loader that reads and
//! validates the file. All fields have defaults, so a partial document
//! (or none at all) yields a usable configuration.

use std::path::Path;

use matflow_types::RewardMode;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// What the tick driver writes to the terminal demand actuator.
///
/// By convention the last actuator in iteration order is the downstream
/// demand switch. Concrete plants disagree on whether the agent's last
/// action is honored or overridden, so the behavior is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalActuatorPolicy {
    /// Force the demand switch active every tick, ignoring the agent.
    #[default]
    ForceActive,
    /// Honor the agent's action for the demand switch like any other
    /// actuator.
    UseAction,
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Plant-level settings (name, seed, action binding, tick length).
    #[serde(default)]
    pub plant: PlantSettings,

    /// Margin band for the fill-level penalty.
    #[serde(default)]
    pub margin: MarginConfig,

    /// Reward flavor and coefficients.
    #[serde(default)]
    pub reward: RewardConfig,

    /// Production and demand targets.
    #[serde(default)]
    pub production: ProductionConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Plant-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantSettings {
    /// Human-readable plant name.
    #[serde(default = "default_plant_name")]
    pub name: String,

    /// Random seed used by `reset` when none is supplied explicitly.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Whether agent action vectors are positionally aligned with the
    /// flattened actuator iteration order.
    #[serde(default = "default_true")]
    pub actions_in_order: bool,

    /// Handling of the terminal demand actuator.
    #[serde(default)]
    pub terminal_actuator: TerminalActuatorPolicy,

    /// Default tick duration in simulated seconds.
    #[serde(default = "default_dt")]
    pub dt: f64,
}

impl Default for PlantSettings {
    fn default() -> Self {
        Self {
            name: default_plant_name(),
            seed: default_seed(),
            actions_in_order: true,
            terminal_actuator: TerminalActuatorPolicy::default(),
            dt: default_dt(),
        }
    }
}

/// Margin band for the piecewise-linear fill-level penalty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarginConfig {
    /// Lower edge of the no-penalty band (normalized fill).
    #[serde(default = "default_margin_low")]
    pub low: f64,

    /// Upper edge of the no-penalty band (normalized fill).
    #[serde(default = "default_margin_high")]
    pub high: f64,

    /// Penalty slope outside the band.
    #[serde(default = "default_margin_slope")]
    pub slope: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            low: default_margin_low(),
            high: default_margin_high(),
            slope: default_margin_slope(),
        }
    }
}

/// Reward flavor and learning-rate-style coefficients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RewardConfig {
    /// Which reward flavor the adaptor produces.
    #[serde(default)]
    pub mode: RewardMode,

    /// Weight of the margin contribution.
    #[serde(default = "default_one")]
    pub lr_margin: f64,

    /// Weight of the power contribution.
    #[serde(default = "default_one")]
    pub lr_power: f64,

    /// Weight of the demand contribution (last agent only).
    #[serde(default = "default_one")]
    pub lr_demand: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            mode: RewardMode::default(),
            lr_margin: default_one(),
            lr_power: default_one(),
            lr_demand: default_one(),
        }
    }
}

/// Production and demand targets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductionConfig {
    /// Demanded output volume per unit time.
    #[serde(default = "default_target_rate")]
    pub target_rate: f64,

    /// Batch-mode production target: once cumulative delivered inventory
    /// reaches this volume, the episode is marked terminal. `None` runs
    /// the plant in continuous mode (never terminal).
    #[serde(default)]
    pub batch_target: Option<f64>,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            target_rate: default_target_rate(),
            batch_target: None,
        }
    }
}

fn default_plant_name() -> String {
    String::from("plant")
}

const fn default_seed() -> u64 {
    42
}

const fn default_true() -> bool {
    true
}

const fn default_dt() -> f64 {
    10.0
}

const fn default_margin_low() -> f64 {
    0.2
}

const fn default_margin_high() -> f64 {
    0.8
}

const fn default_margin_slope() -> f64 {
    1.0
}

const fn default_one() -> f64 {
    1.0
}

const fn default_target_rate() -> f64 {
    0.2
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.plant.seed, 42);
        assert!(config.plant.actions_in_order);
        assert!(config.production.batch_target.is_none());
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let yaml = r"
plant:
  name: bottling_line
  seed: 7
  terminal_actuator: use_action
reward:
  mode: overall
  lr_margin: 0.5
production:
  batch_target: 500.0
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.plant.name, "bottling_line");
        assert_eq!(config.plant.seed, 7);
        assert_eq!(
            config.plant.terminal_actuator,
            TerminalActuatorPolicy::UseAction
        );
        assert_eq!(config.reward.mode, matflow_types::RewardMode::Overall);
        assert!((config.reward.lr_margin - 0.5).abs() < 1e-12);
        assert!((config.reward.lr_power - 1.0).abs() < 1e-12);
        let target = config.production.batch_target.unwrap();
        assert!((target - 500.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = SimulationConfig::parse("plant: [not, a, mapping]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn margin_band_defaults() {
        let config = SimulationConfig::default();
        assert!((config.margin.low - 0.2).abs() < 1e-12);
        assert!((config.margin.high - 0.8).abs() < 1e-12);
        assert!((config.margin.slope - 1.0).abs() < 1e-12);
    }
}
