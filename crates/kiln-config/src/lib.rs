//! Configuration system for kiln.
//!
//! Load annealer configuration from TOML or YAML files to control the
//! cooling schedule, event delivery, the explorer strategy, and scenario
//! execution without code changes.
//!
//! # Examples
//!
//! Parse configuration from a TOML string:
//!
//! ```
//! use kiln_config::{AnnealerConfig, NotifierMode};
//!
//! let config = AnnealerConfig::from_toml_str(r#"
//!     starting_temperature = 1000.0
//!     cooling_factor = 0.95
//!     max_iterations = 500
//!     notifier_mode = "concurrent"
//!
//!     [explorer]
//!     name = "knapsack"
//!     params = { capacity = 120.0, seed = 42 }
//! "#).unwrap();
//!
//! assert_eq!(config.starting_temperature, 1000.0);
//! assert_eq!(config.notifier_mode, NotifierMode::Concurrent);
//! assert_eq!(config.explorer.unwrap().name, "knapsack");
//! ```
//!
//! Use default config when a file is missing:
//!
//! ```
//! use kiln_config::AnnealerConfig;
//!
//! let config = AnnealerConfig::load("annealer.toml").unwrap_or_default();
//! // Proceeds with defaults if the file doesn't exist
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main annealer configuration.
///
/// Invalid numeric values are not rejected here; the builder validates
/// them and aggregates every failure from one build attempt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AnnealerConfig {
    /// Starting temperature of the cooling schedule.
    #[serde(default = "defaults::temperature")]
    pub starting_temperature: f64,

    /// Multiplicative decay applied to the temperature once per iteration.
    #[serde(default = "defaults::cooling_factor")]
    pub cooling_factor: f64,

    /// Number of iterations to run; zero makes the loop a no-op.
    #[serde(default)]
    pub max_iterations: u64,

    /// How lifecycle events are delivered to observers.
    #[serde(default)]
    pub notifier_mode: NotifierMode,

    /// Named reference to a registered solution explorer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<ExplorerConfig>,

    /// Scenario execution settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioConfig>,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            starting_temperature: defaults::temperature(),
            cooling_factor: defaults::cooling_factor(),
            max_iterations: 0,
            notifier_mode: NotifierMode::default(),
            explorer: None,
            scenario: None,
        }
    }
}

impl AnnealerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the starting temperature.
    pub fn with_starting_temperature(mut self, temperature: f64) -> Self {
        self.starting_temperature = temperature;
        self
    }

    /// Sets the cooling factor.
    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the notifier mode.
    pub fn with_notifier_mode(mut self, mode: NotifierMode) -> Self {
        self.notifier_mode = mode;
        self
    }

    /// Sets the explorer reference.
    pub fn with_explorer(mut self, explorer: ExplorerConfig) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Sets the scenario section.
    pub fn with_scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.scenario = Some(scenario);
        self
    }
}

/// How lifecycle events are delivered to registered observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierMode {
    /// Observers are invoked inline, in registration order; the annealing
    /// loop blocks until every observer has handled the current event.
    #[default]
    Sequential,
    /// Each observer drains its own queue on a dedicated worker; ordering
    /// is guaranteed only within one observer's stream.
    Concurrent,
}

/// Named reference to a registered solution explorer plus its parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExplorerConfig {
    /// Registered type name of the explorer.
    pub name: String,

    /// Explorer-specific parameter map, passed through verbatim.
    #[serde(default)]
    pub params: HashMap<String, ParamValue>,
}

impl ExplorerConfig {
    /// Creates a reference to the named explorer with no parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    /// Adds one parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// A value in an explorer's parameter map.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Non-negative integer view.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Scenario execution settings: how many independent runs of the
/// configured annealer, and whether they run concurrently.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Scenario name, used to derive per-run identifiers.
    pub name: String,

    /// Number of independent runs.
    #[serde(default = "defaults::runs")]
    pub runs: usize,

    /// Run concurrently on independent threads instead of sequentially.
    #[serde(default)]
    pub concurrent: bool,
}

mod defaults {
    pub fn temperature() -> f64 {
        1.0
    }

    pub fn cooling_factor() -> f64 {
        1.0
    }

    pub fn runs() -> usize {
        1
    }
}
